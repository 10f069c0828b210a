use crate::config::ConversionConfig;
use crate::dfa::Dfa;
use crate::error_handling::Result;
use crate::export::ExportMap;
use crate::nfa::Nfa;
use crate::parser::{AstNode, RegexParser};
use std::fmt::Debug;
use std::rc::Rc;

pub fn lex_and_parse(regex: &str) -> Result<AstNode> {
    RegexParser::new().parse_into_ast(regex)
}

pub fn lex_and_parse_with_config(regex: &str, config: &ConversionConfig) -> Result<AstNode> {
    RegexParser::with_config(config).parse_into_ast(regex)
}

pub fn build_nfa(ast: &AstNode) -> Nfa {
    Nfa::from_ast(ast)
}

pub fn determinize(nfa: &Nfa) -> Result<Dfa> {
    Dfa::from_nfa(nfa)
}

pub fn minimize(dfa: &Dfa) -> Result<Dfa> {
    dfa.minimize()
}

pub struct Converter {
    config: Rc<ConversionConfig>,
}

// Everything one regex turns into. Built only when every stage succeeded.
pub struct Conversion {
    regex: String,
    ast: AstNode,
    nfa: Nfa,
    dfa: Dfa,
    min_dfa: Dfa,
}

impl Converter {
    pub fn new(config: Rc<ConversionConfig>) -> Self {
        Self { config }
    }

    pub fn get_config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn convert(&self, regex: &str) -> Result<Conversion> {
        let ast = lex_and_parse_with_config(regex, &self.config)?;
        let nfa = build_nfa(&ast);
        let dfa = determinize(&nfa)?;
        let min_dfa = minimize(&dfa)?;
        Ok(Conversion {
            regex: regex.to_string(),
            ast,
            nfa,
            dfa,
            min_dfa,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Rc::new(ConversionConfig::default()))
    }
}

impl Conversion {
    pub fn get_regex(&self) -> &str {
        &self.regex
    }

    pub fn get_ast(&self) -> &AstNode {
        &self.ast
    }

    pub fn get_nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn get_dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn get_min_dfa(&self) -> &Dfa {
        &self.min_dfa
    }

    pub fn to_export(&self) -> Result<ExportMap> {
        let mut export = ExportMap::new();
        export.insert("regex".to_string(), self.regex.clone().into());
        export.insert("nfa".to_string(), Self::to_object(self.nfa.to_export()?));
        export.insert("dfa".to_string(), Self::to_object(self.dfa.to_export()?));
        export.insert("min_dfa".to_string(), Self::to_object(self.min_dfa.to_export()?));
        Ok(export)
    }

    fn to_object(export: ExportMap) -> serde_json::Value {
        serde_json::Value::Object(export.into_iter().collect())
    }
}

impl Debug for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Conversion( regex: {:?}, ast: {:?},\n{:?},\n{:?},\nminimal {:?} )",
            self.regex, self.ast, self.nfa, self.dfa, self.min_dfa
        )
    }
}
