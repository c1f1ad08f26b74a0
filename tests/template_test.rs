//! Tests for resolving `@{key}` templates through the variable tree

use rstest::{fixture, rstest};

use settree::template::{self, Dictionary, Variable, ROOT_KEY};
use settree::util::testing;
use settree::{SetTree, TreeError};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn dictionary() -> Dictionary {
    Dictionary::new(vec![
        Variable::new("name", "Scarlet"),
        Variable::new("message", "Message with @{part1} and @{part2}"),
        Variable::new("part1", "**part1**"),
        Variable::new("part2", "&&part2&&"),
    ])
}

#[rstest]
fn given_greeting_when_resolving_then_nested_references_substituted(dictionary: Dictionary) {
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, "Hello, @{name}! @{message}."));
    let root = tree.root();

    let resolved = template::resolve(&mut tree, root, &dictionary).unwrap();

    assert_eq!(resolved, "Hello, Scarlet! Message with **part1** and &&part2&&.");
    assert_eq!(tree.value(root).map(|v| v.value.as_str()), Some(resolved.as_str()));
}

#[rstest]
fn given_greeting_when_expanding_then_tree_mirrors_references(dictionary: Dictionary) {
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, "Hello, @{name}! @{message}."));
    let root = tree.root();

    template::expand(&mut tree, root, &dictionary).unwrap();

    assert_eq!(
        tree.display(root).to_string(),
        "root=Hello, @{name}! @{message}. -> [name=Scarlet -> [], \
         message=Message with @{part1} and @{part2} -> [part1=**part1** -> [], part2=&&part2&& -> []]]"
    );
}

#[rstest]
#[case::greeting("Hello, @{name}! @{message}.", "Hello, Scarlet! Message with **part1** and &&part2&&.")]
#[case::shared_reference(
    "Hello, @{name}! @{message}. From @{part1}.",
    "Hello, Scarlet! Message with **part1** and &&part2&&. From **part1**."
)]
#[case::single_reference("@{message}", "Message with **part1** and &&part2&&")]
#[case::unknown_key("@{nobody} says @{name}", "@{nobody} says Scarlet")]
#[case::plain_text("no references here", "no references here")]
#[case::repeated("@{name}, @{name}", "Scarlet, Scarlet")]
fn given_template_when_rendering_then_resolves(
    dictionary: Dictionary,
    #[case] text: &str,
    #[case] expected: &str,
) {
    assert_eq!(template::render(text, &dictionary).unwrap(), expected);
}

#[rstest]
fn given_changed_root_when_resolving_again_then_uses_new_template(dictionary: Dictionary) {
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, "Hello, @{name}! @{message}."));
    let root = tree.root();
    template::resolve(&mut tree, root, &dictionary).unwrap();

    if let Some(variable) = tree.value_mut(root) {
        variable.value = "@{message}".to_string();
    }
    let resolved = template::resolve(&mut tree, root, &dictionary).unwrap();

    assert_eq!(resolved, "Message with **part1** and &&part2&&");
    assert_eq!(tree.children(root).len(), 1);
}

#[test]
fn given_self_reference_when_rendering_then_duplicate_error() {
    let dictionary = Dictionary::new(vec![Variable::new("loop", "again @{loop}")]);

    let result = template::render("@{loop}", &dictionary);

    assert!(matches!(result, Err(TreeError::DuplicateValue { .. })));
}

#[test]
fn given_indirect_cycle_when_rendering_then_duplicate_error_names_variable() {
    let dictionary = Dictionary::new(vec![
        Variable::new("a", "a needs @{b}"),
        Variable::new("b", "b needs @{a}"),
    ]);

    let err = template::render("start @{a}", &dictionary).unwrap_err();

    match err {
        TreeError::DuplicateValue { value, .. } => assert!(value.contains("a needs @{b}")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn given_one_shot_invalidate_when_building_then_nested_references_remain() {
    let dictionary = dictionary();
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, "Hello, @{name}! @{message}."));
    let root = tree.root();

    tree.invalidate(root, |_, variable| dictionary.references(variable))
        .unwrap();
    let built = template::build(&mut tree, root);

    assert_eq!(built, "Hello, Scarlet! Message with @{part1} and @{part2}.");
}

#[test]
fn given_built_tree_when_building_again_then_stable() {
    let dictionary = dictionary();
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, "@{message}"));
    let root = tree.root();
    template::expand(&mut tree, root, &dictionary).unwrap();

    let first = template::build(&mut tree, root);
    let second = template::build(&mut tree, root);

    assert_eq!(first, second);
}
