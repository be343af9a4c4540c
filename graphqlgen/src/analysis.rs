//! Grammar consistency self-check.
//!
//! The grammar is hand-written combinators, so there is nothing the type
//! system can do about a production that re-enters itself before consuming a
//! token; at runtime that is an infinite recursion. This module keeps a
//! table of every production edge that can be taken without progress and
//! refuses to parse anything if that graph has a cycle.

use std::sync::Once;

/// For each production, the productions it may invoke while the stream is
/// still at the position it was entered at. Must be kept in sync with
/// `query::grammar` and `schema::grammar` by hand.
const EPSILON_CALLS: &[(&str, &[&str])] = &[
    // executable documents
    ("Document", &["Definition"]),
    (
        "Definition",
        &["SelectionSet", "OperationDefinition", "FragmentDefinition"],
    ),
    ("OperationDefinition", &[]), // consumes `query` / `mutation` / `subscription`
    ("FragmentDefinition", &[]),  // consumes `fragment`
    ("SelectionSet", &[]),        // consumes `{`
    ("Selection", &["Field"]),
    ("Field", &[]), // consumes a Name
    ("Arguments", &[]),
    ("Directives", &[]),
    ("Value", &["PlainValue"]),
    ("PlainValue", &[]),
    ("Type", &[]), // consumes a Name or `[`
    // schema documents; descriptions are optional string tokens, so every
    // definition production is reachable without progress
    ("SchemaDocument", &["SchemaDefinitionEntry"]),
    (
        "SchemaDefinitionEntry",
        &[
            "SchemaDefinition",
            "TypeDefinition",
            "TypeExtension",
            "DirectiveDefinition",
            "OperationDefinition",
            "FragmentDefinition",
            "SelectionSet",
        ],
    ),
    ("SchemaDefinition", &[]), // consumes `schema`
    (
        "TypeDefinition",
        &[
            "ScalarType",
            "ObjectType",
            "InterfaceType",
            "UnionType",
            "EnumType",
            "InputObjectType",
        ],
    ),
    ("TypeExtension", &[]), // consumes `extend`
    ("DirectiveDefinition", &[]),
    ("ScalarType", &[]), // all consume their keyword after an optional description
    ("ObjectType", &[]),
    ("InterfaceType", &[]),
    ("UnionType", &[]),
    ("EnumType", &[]),
    ("InputObjectType", &[]),
];

fn epsilon_calls(name: &str) -> &'static [&'static str] {
    EPSILON_CALLS
        .iter()
        .find(|(production, _)| *production == name)
        .map(|(_, calls)| *calls)
        .unwrap_or(&[])
}

/// Depth-first search for a cycle in the no-progress call graph. Returns the
/// productions forming the cycle, if any.
fn find_cycle() -> Option<Vec<&'static str>> {
    fn visit(
        name: &'static str,
        stack: &mut Vec<&'static str>,
        done: &mut Vec<&'static str>,
    ) -> bool {
        if done.contains(&name) {
            return false;
        }
        if let Some(pos) = stack.iter().position(|&n| n == name) {
            stack.drain(..pos);
            stack.push(name);
            return true;
        }
        stack.push(name);
        for &callee in epsilon_calls(name) {
            if visit(callee, stack, done) {
                return true;
            }
        }
        stack.pop();
        done.push(name);
        false
    }

    let mut done = Vec::new();
    for &(name, _) in EPSILON_CALLS {
        let mut stack = Vec::new();
        if visit(name, &mut stack, &mut done) {
            return Some(stack);
        }
    }
    None
}

/// Run once per process before the first parse. A positive result is a bug
/// in the grammar itself, never a property of the input.
pub(crate) fn check_grammar() {
    static CHECK: Once = Once::new();
    CHECK.call_once(|| {
        if let Some(cycle) = find_cycle() {
            panic!(
                "grammar contains a cycle without progress: {}",
                cycle.join(" -> ")
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::find_cycle;

    #[test]
    fn grammar_makes_progress() {
        assert_eq!(find_cycle(), None);
    }
}
