//! Structural validation scenarios: cardinality, pattern matching,
//! recursion, and diagnostics.

use denada::{parse, process, RuleError, Validation};

fn check(content: &str, rules: &str) -> Validation {
    let tree = parse(content).unwrap();
    let rule_tree = parse(rules).unwrap();
    process(&tree, &rule_tree).unwrap()
}

fn assert_conformant(content: &str, rules: &str) {
    let validation = check(content, rules);
    assert!(
        validation.is_conformant(),
        "unexpected issues for {content:?} vs {rules:?}: {:#?}",
        validation.issues
    );
}

fn assert_issues(content: &str, rules: &str) {
    let validation = check(content, rules);
    assert!(
        !validation.is_conformant(),
        "expected issues for {content:?} vs {rules:?}"
    );
}

// --- Trivial trees ---------------------------------------------------------

#[test]
fn empty_content_against_empty_rules_is_conformant() {
    assert_conformant("", "");
}

#[test]
fn empty_rules_yield_one_issue_per_top_level_node() {
    let validation = check("Real x; X { Real y; }", "");
    assert_eq!(validation.issues.len(), 2);
    for issue in &validation.issues {
        assert!(issue.contains("Unable to find a matching rule"), "{issue}");
    }
}

// --- Cardinality -----------------------------------------------------------

#[test]
fn star_rules_accept_zero_one_or_two() {
    for content in ["", "Real x;", "Real x; Integer x;"] {
        assert_conformant(content, "_ x \"realvar*\";");
    }
}

#[test]
fn plus_rules_require_at_least_one() {
    assert_issues("", "_ x \"realvar+\";");
    assert_conformant("Real x;", "_ x \"realvar+\";");
    assert_conformant("Real x; Integer x;", "_ x \"realvar+\";");
}

#[test]
fn question_rules_allow_at_most_one() {
    assert_conformant("", "_ x \"realvar?\";");
    assert_conformant("Real x;", "_ x \"realvar?\";");
    assert_issues("Real x; Integer x;", "_ x \"realvar?\";");
}

#[test]
fn bare_rules_require_exactly_one() {
    assert_issues("", "_ x \"realvar\";");
    assert_conformant("Real x;", "_ x \"realvar\";");
    assert_issues("Real x; Integer x;", "_ x \"realvar\";");
}

#[test]
fn cardinality_issues_report_bounds_and_counts() {
    let validation = check("", "_ x \"realvar+\";");
    assert_eq!(
        validation.issues,
        vec!["Expected at least 1 matches for rule realvar but found 0"]
    );

    let validation = check("Real x; Integer x;", "_ x \"realvar?\";");
    assert!(validation
        .issues
        .contains(&"Expected at most 1 matches for rule realvar but found 2".to_string()));
}

// --- Typenames and varnames ------------------------------------------------

#[test]
fn typenames_match_literally_or_by_pattern() {
    assert_conformant("Real x;", "Real x \"realvar\";");
    assert_conformant("Real x;", "_ x \"realvar\";");
    assert_conformant("Real x; Rigid z; Really y;", "'/^R/' _ \"realvar+\";");
    assert_issues("Integer y;", "Real y \"realvar\";");
    assert_issues("Integer y;", "'/^(Real|String)$/' y \"realvar\";");
}

#[test]
fn varnames_match_literally_or_by_pattern() {
    assert_conformant("Real x;", "Real _ \"realvar\";");
    assert_conformant("Real x;", "Real '/^(x|y|z)$/' \"realvar\";");
    assert_issues("Real x;", "Real y \"realvar\";");
    assert_issues("Real x;", "Real '/^(a|b|c)$/' \"realvar\";");
}

// --- Values ----------------------------------------------------------------

#[test]
fn values_match_literally() {
    assert_conformant("Real x = 1;", "Real x = 1 \"realvar\";");
    assert_issues("Real x = 1;", "Real x = 2 \"realvar\";");
}

#[test]
fn values_match_type_patterns() {
    assert_conformant("Real x = 1;", "Real x = \"$number\" \"realvar\";");
    assert_conformant("Real x = 1;", "Real x = \"$_\" \"realvar\";");
    assert_conformant("Real x = 1;", "Real x = \"$number|boolean\" \"realvar\";");
    assert_issues("Real x = 1;", "Real x = \"$boolean\" \"realvar\";");
}

#[test]
fn unassigned_rules_only_match_unassigned_declarations() {
    assert_issues("Real x = 1;", "Real x \"realvar\";");
    assert_issues("Real x;", "Real x = 1 \"realvar\";");
}

#[test]
fn string_values_match_literally_or_by_pattern() {
    assert_conformant("String z = \"hello\";", "String z = \"hello\" \"strvar*\";");
    assert_conformant("String z = \"hello\";", "String z = \"_\" \"strvar*\";");
    assert_conformant("String z = \"foo\";", "String z = \"/^(foo|bar)$/\" \"strvar*\";");
    assert_issues("String z = \"fuz\";", "String z = \"/^(foo|bar)$/\" \"strvar*\";");
    assert_issues("String z = \"hello\";", "String y = \"hello\" \"strvar*\";");
}

#[test]
fn object_value_patterns_are_json_schemas() {
    let rules = "parameter _ = {\"type\": \"object\", \"required\": [\"label\"]} \"p_hints*\";";
    assert_conformant("parameter a = {\"label\": \"speed\"};", rules);
    assert_issues("parameter a = {\"units\": \"m\"};", rules);
}

// --- Qualifiers ------------------------------------------------------------

#[test]
fn qualifiers_match_exactly_or_by_pattern() {
    assert_conformant("constant Real x;", "constant Real x \"realvar\";");
    assert_conformant(
        "constant Real x; volatile discrete Real x;",
        "_ Real x \"realvar+\";",
    );
    assert_conformant(
        "constant Real x; volatile discrete Real x;",
        "'/^(constant|volatile|discrete)$/' Real x \"realvar+\";",
    );
    assert_issues("constant Real x;", "parameter Real x \"realvar\";");
    assert_issues(
        "continuous Real x; volatile discrete Real x;",
        "'/^(constant|volatile|discrete)$/' Real x \"realvar+\";",
    );
}

#[test]
fn optional_qualifier_patterns_need_no_match() {
    assert_conformant("Real x;", "'hidden?' Real x \"realvar\";");
    assert_conformant("hidden Real x;", "'hidden?' Real x \"realvar\";");
}

#[test]
fn missing_required_qualifiers_are_reported() {
    let validation = check("Real x;", "constant Real x \"realvar\";");
    assert!(
        validation
            .issues
            .iter()
            .any(|issue| issue.contains("missing required qualifier constant")),
        "{:#?}",
        validation.issues
    );
}

// --- Modifiers -------------------------------------------------------------

#[test]
fn modifiers_match_exactly_or_by_pattern() {
    assert_conformant("Real x(y=5);", "Real x(y=5) \"realvar\";");
    assert_conformant("Real x(y=5);", "Real x(_=\"$_\") \"realvar\";");
    assert_conformant("Real x(y=5);", "Real x(_=\"$number\") \"realvar\";");
    assert_conformant("Real x(y=5);", "Real x('/^(y|z)$/'=\"$_\") \"realvar\";");
    assert_conformant(
        "Real x(y=5,z=true);",
        "Real x('/^(y|z)$/'=\"$number|boolean\") \"realvar\";",
    );
}

#[test]
fn unexpected_modifiers_reject_the_match() {
    assert_issues("Real x(y=5);", "Real x(z=5) \"realvar\";");
    assert_issues("Real x(y=true);", "Real x(_=\"$number\") \"realvar\";");
    assert_issues("Real x(a=5);", "Real x('/^(y|z)$/'=\"$_\") \"realvar\";");
}

// --- Definitions -----------------------------------------------------------

#[test]
fn definitions_validate_nested_contents() {
    assert_conformant("X { Real x; }", "X \"X\" { Real x \"realvar\"; }");
}

#[test]
fn nested_issues_surface_without_undoing_the_match() {
    let validation = check("X { Real y; }", "X \"X\" { Real x \"realvar\"; }");
    assert!(!validation.is_conformant());
    // The definition itself still matched and was counted.
    let tree = parse("X { Real y; }").unwrap();
    let rules = parse("X \"X\" { Real x \"realvar\"; }").unwrap();
    let validation = process(&tree, &rules).unwrap();
    assert_eq!(validation.matches.rule_for(&tree[0]), Some("X"));
}

#[test]
fn definition_qualifiers_and_names_must_match() {
    assert_issues("foo X { Real y; }", "X \"X\" { Real x \"realvar\"; }");
    assert_issues("Y { Real x; }", "X \"X\" { Real x \"realvar\"; }");
}

#[test]
fn definition_cardinality_is_enforced() {
    assert_issues(
        "X { Real x; } X { Real x; }",
        "X \"X\" { Real x \"realvar\"; }",
    );
}

#[test]
fn empty_rule_bodies_only_accept_empty_definitions() {
    assert_conformant("X {}", "X \"X*\" { }");
    let validation = check("X { Real x; }", "X \"X*\" { }");
    assert_eq!(validation.issues.len(), 1);
    assert!(validation.issues[0].contains("Real x"));
}

// --- Recursive rules -------------------------------------------------------

#[test]
fn recursive_rules_accept_self_similar_nesting() {
    assert_conformant("X { X {} }", "X \"^X*\" { }");
    assert_conformant("X { X { X {} } X {} }", "X \"^X*\" { }");
}

#[test]
fn non_recursive_rules_reject_nesting() {
    assert_issues("X { X {} }", "X \"X*\" { }");
}

// --- Rule trees with problems ---------------------------------------------

#[test]
fn rules_without_descriptions_become_soft_issues() {
    let validation = check("", "Real x;");
    assert_eq!(validation.issues.len(), 1);
    assert!(validation.issues[0].starts_with("Rule without a rule name"));
}

#[test]
fn mismatched_descriptor_text_is_fatal() {
    let tree = parse("Real x;").unwrap();
    let rules = parse("Real x \"var*\"; Integer y \"var+\";").unwrap();
    let err = process(&tree, &rules).unwrap_err();
    assert!(matches!(err, RuleError::CardinalityMismatch { .. }));
}

#[test]
fn malformed_descriptors_are_fatal() {
    let tree = parse("Real x;").unwrap();
    let rules = parse("Real x \"not a descriptor\";").unwrap();
    let err = process(&tree, &rules).unwrap_err();
    assert!(matches!(err, RuleError::DescriptorSyntax { .. }));
}

// --- Wildcard rule names ---------------------------------------------------

#[test]
fn wildcard_rule_names_are_legal_group_keys() {
    let tree = parse("Real x;").unwrap();
    let rules = parse("_ _ \"_*\";").unwrap();
    let validation = process(&tree, &rules).unwrap();
    assert!(validation.is_conformant());
    assert_eq!(validation.matches.rule_for(&tree[0]), Some("_"));
}

#[test]
fn wildcard_rules_still_enforce_value_checks() {
    assert_issues("Real x = 1;", "_ _ = \"$boolean\" \"_*\";");
}

// --- Annotations -----------------------------------------------------------

#[test]
fn matches_record_rule_names_and_ordinals() {
    let tree = parse("Real x; Real y; Integer a.b; Boolean correct;").unwrap();
    let rules = parse(
        "Real _ \"realvar*\"; Integer _ \"intvar*\"; Boolean _ \"boolvar*\";",
    )
    .unwrap();
    let validation = process(&tree, &rules).unwrap();
    assert!(validation.is_conformant());

    let info = |i: usize| validation.matches.get(tree[i].id).unwrap();
    assert_eq!((info(0).rule.as_str(), info(0).ordinal), ("realvar", 0));
    assert_eq!((info(1).rule.as_str(), info(1).ordinal), ("realvar", 1));
    assert_eq!((info(2).rule.as_str(), info(2).ordinal), ("intvar", 0));
    assert_eq!((info(3).rule.as_str(), info(3).ordinal), ("boolvar", 0));
}

#[test]
fn revalidation_is_repeatable() {
    let tree = parse("Real x; Real y;").unwrap();
    let rules = parse("Real _ \"realvar*\";").unwrap();
    let first = process(&tree, &rules).unwrap();
    let second = process(&tree, &rules).unwrap();
    assert_eq!(first.issues, second.issues);
    assert_eq!(first.matches, second.matches);
}

// --- Diagnostics -----------------------------------------------------------

#[test]
fn unmatched_issues_carry_location_and_reasons() {
    let validation = check("Integer y;", "Real y \"realvar\";");
    assert_eq!(validation.issues.len(), 2); // unmatched node + unmet cardinality
    let issue = &validation.issues[0];
    assert!(issue.starts_with("Line 1, column 1"), "{issue}");
    assert!(issue.contains("Unable to find a matching rule for element: Integer y;"), "{issue}");
    assert!(
        issue.contains("Type name Integer didn't match name pattern Real for rule realvar"),
        "{issue}"
    );
}

#[test]
fn unmatched_issues_name_the_originating_file() {
    let tree = denada::parse_named("Integer y;", "content.dnd").unwrap();
    let rules = parse("Real y \"realvar\";").unwrap();
    let validation = process(&tree, &rules).unwrap();
    assert!(
        validation.issues[0].contains("of content.dnd"),
        "{}",
        validation.issues[0]
    );
}

#[test]
fn rejection_reasons_accumulate_across_groups() {
    let validation = check("Integer y;", "Real _ \"realvar\"; String _ \"strvar\";");
    let issue = &validation.issues[0];
    assert!(issue.contains("for rule realvar"), "{issue}");
    assert!(issue.contains("for rule strvar"), "{issue}");
}
