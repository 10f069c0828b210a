//! Property-based tests for the regex to automaton pipeline
//!
//! Random regexes are generated from a small grammar over `a`, `b` and `c`, so every
//! generated pattern is well formed and its automata stay small.

use proptest::prelude::*;
use regex_fa::converter::Converter;
use regex_fa::{build_nfa, determinize, lex_and_parse, minimize};

/// Generate well-formed regexes over a three letter alphabet
fn regex_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[abc]",
        Just("[a-c]".to_string()),
        Just("[ab]".to_string()),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{}{}", l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({}|{})", l, r)),
            inner.clone().prop_map(|r| format!("({})*", r)),
            inner.clone().prop_map(|r| format!("({})+", r)),
            inner.prop_map(|r| format!("({})?", r)),
        ]
    })
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_literal_string_matches_only_itself(
            word in "[a-z0-9]{1,10}",
            other in "[a-z0-9]{0,11}",
        ) {
            let conversion = Converter::default().convert(&word).unwrap();
            let min_dfa = conversion.get_min_dfa();
            prop_assert!(min_dfa.simulate(&word));
            prop_assert_eq!(min_dfa.simulate(&other), other == word);
            prop_assert_eq!(min_dfa.get_num_states(), word.chars().count() + 1);
        }

        #[test]
        fn test_all_stages_agree(regex in regex_strategy(), input in "[abcd]{0,8}") {
            let nfa = build_nfa(&lex_and_parse(&regex).unwrap());
            let dfa = determinize(&nfa).unwrap();
            let min_dfa = minimize(&dfa).unwrap();

            let expected = nfa.simulate(&input).unwrap();
            prop_assert_eq!(dfa.simulate(&input), expected, "{} on {:?}", regex, input);
            prop_assert_eq!(min_dfa.simulate(&input), expected, "{} on {:?}", regex, input);
        }

        #[test]
        fn test_dfa_is_deterministic(regex in regex_strategy()) {
            let conversion = Converter::default().convert(&regex).unwrap();
            for dfa in [conversion.get_dfa(), conversion.get_min_dfa()] {
                for state in dfa.get_states() {
                    let transitions = dfa.get_transitions_from_state(state).unwrap();
                    prop_assert!(transitions.keys().all(|c| dfa.get_alphabet().contains(c)));
                }
            }
            prop_assert!(
                conversion.get_min_dfa().get_num_states() <= conversion.get_dfa().get_num_states()
            );
        }

        #[test]
        fn test_minimize_is_idempotent(regex in regex_strategy()) {
            let min_dfa = Converter::default().convert(&regex).unwrap().get_min_dfa().minimize().unwrap();
            let again = min_dfa.minimize().unwrap();
            prop_assert_eq!(again.get_num_states(), min_dfa.get_num_states());
            prop_assert_eq!(again.to_export().unwrap(), min_dfa.to_export().unwrap());
        }

        #[test]
        fn test_arbitrary_input_never_panics(input in "[ab()|*+?\\[\\]-]{0,12}") {
            match Converter::default().convert(&input) {
                Ok(conversion) => prop_assert!(conversion.to_export().is_ok()),
                Err(e) => prop_assert!(e.is_syntax_error(), "{}: {}", input, e),
            }
        }
    }
}
