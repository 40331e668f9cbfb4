//! End-to-end scenarios driving the full pipeline through the public
//! pattern handle: compile, match, search, captures.
#![cfg(test)]

use pretty_assertions::assert_eq;
use rangex_compiler::Regex;

#[test]
fn alternation_steps_through_the_haystack() {
    let re = Regex::new("a|b").unwrap();
    let input = "ab";

    assert_eq!(Some(0..1), re.next_match(input, 0).map(|m| m.span));
    assert_eq!(Some(1..2), re.next_match(input, 1).map(|m| m.span));
    assert_eq!(None, re.next_match(input, 2));
}

#[test]
fn bounded_repetition_takes_the_longest_run() {
    let re = Regex::new("[a-c]{2,4}").unwrap();

    assert_eq!(Some(0..4), re.next_match("abcabd", 0).map(|m| m.span));
}

#[test]
fn negative_lookahead_rejects_only_the_described_continuation() {
    let re = Regex::new("(?!abd)abc").unwrap();

    let found = re.matches("abc").unwrap();
    assert_eq!(0..3, found.span);
    assert!(found.captures.is_empty());
}

#[test]
fn backreference_repeats_the_captured_run() {
    let re = Regex::new(r"(a*)bc\1").unwrap();

    let found = re.next_match("aabcaaa", 0).unwrap();
    assert_eq!(0..6, found.span);
    assert_eq!(vec![0..2], found.captures);
}

#[test]
fn multiple_backreferences_resolve_against_their_groups() {
    let re = Regex::new(r"(a*)(b*)c\1\1\2").unwrap();

    let found = re.matches("aabcaaaab").unwrap();
    assert_eq!(0..9, found.span);
    assert_eq!(vec![0..2, 2..3], found.captures);
}

#[test]
fn wide_character_alternation_searches_correctly() {
    let re = Regex::new("(?:0|的)+").unwrap();

    assert_eq!(Some(1..3), re.search("1的0").map(|m| m.span));
    assert_eq!(Some(1..3), re.search("10的").map(|m| m.span));
}

#[test]
fn anchors_span_the_whole_run() {
    assert_eq!(
        Some(0..3),
        Regex::new("^a+").unwrap().next_match("aaa", 0).map(|m| m.span)
    );
    assert_eq!(
        Some(0..3),
        Regex::new("a+$").unwrap().next_match("aaa", 0).map(|m| m.span)
    );
}

#[test]
fn empty_pattern_compiles_to_an_empty_handle() {
    let re = Regex::new("").unwrap();

    assert!(re.is_empty());
    assert_eq!(None, re.matches(""));
    assert_eq!(None, re.search("abc"));
}

#[test]
fn nullable_pattern_accepts_the_empty_input() {
    let re = Regex::new("a*").unwrap();

    let found = re.matches("").unwrap();
    assert_eq!(0..0, found.span);
    assert!(found.captures.is_empty());
}

#[test]
fn search_result_rematches_as_a_whole_input() {
    let cases = [
        ("ab+c", "xxabbbcz"),
        (r"(a*)ab\1", "ccaabaaa"),
        ("[a-c]{2,4}", "zzabcabd"),
        (r"\w+\b", "hi there"),
        ("(?=a)a+", "xxaaay"),
    ];

    for (pattern, input) in cases {
        let re = Regex::new(pattern).unwrap();
        let found = re.search(input).expect(pattern);

        let chars: Vec<char> = input.chars().collect();
        let substring: String = chars[found.span.clone()].iter().collect();

        let rematch = re.matches(&substring).expect(pattern);
        assert_eq!(
            found.span.end - found.span.start,
            rematch.span.end,
            "pattern `{}`",
            pattern
        );

        let shifted: Vec<_> = found
            .captures
            .iter()
            .map(|capture| capture.start - found.span.start..capture.end - found.span.start)
            .collect();
        assert_eq!(shifted, rematch.captures, "pattern `{}`", pattern);
    }
}

#[test]
fn non_capturing_wrappers_do_not_change_accepting_positions() {
    let cases = [
        ("ab+c", "a(?:b+)c"),
        ("a|bc", "(?:a|bc)"),
        ("[a-c]{2,4}", "(?:[a-c]{2,4})"),
        ("a+$", "(?:a+)$"),
    ];
    let inputs = ["", "a", "bc", "abbbc", "abcabd", "aaa", "xabbbcx"];

    for (plain, wrapped) in cases {
        let plain_re = Regex::new(plain).unwrap();
        let wrapped_re = Regex::new(wrapped).unwrap();

        for input in inputs {
            for start in 0..=input.chars().count() {
                assert_eq!(
                    plain_re.next_match(input, start).map(|m| m.span),
                    wrapped_re.next_match(input, start).map(|m| m.span),
                    "`{}` vs `{}` on `{}` at {}",
                    plain,
                    wrapped,
                    input,
                    start
                );
            }
        }
    }
}

#[test]
fn quantifier_bound_faults_fail_construction() {
    assert!(Regex::new("a{3,1}").is_err());
    assert!(Regex::new("a{x}").is_err());
    assert!(Regex::new("a{1,3}").is_ok());
}

#[test]
fn lookbehind_degrades_to_the_empty_handle() {
    let re = Regex::new("(?<=a)b").unwrap();

    assert!(re.is_empty());
    assert_eq!(None, re.search("ab"));
}
