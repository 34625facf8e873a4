use toolgate::catalog::{actions_of, ALWAYS_AVAILABLE_TOOLS};
use toolgate::modes::{
    all_modes, builtin_modes, default_mode_slug, is_custom, resolve, tools_for, GroupAssignment,
    ModeConfig,
};

fn custom_mode(slug: &str) -> ModeConfig {
    ModeConfig {
        slug: slug.to_string(),
        name: format!("Custom {slug}"),
        role_definition: "custom role".to_string(),
        when_to_use: None,
        groups: vec![GroupAssignment::Bare("read".to_string())],
        custom_instructions: None,
    }
}

#[test]
fn custom_mode_fully_replaces_builtin_of_same_slug() {
    let customs = vec![custom_mode("code")];

    let resolved = resolve("code", &customs).expect("resolve code");
    assert_eq!(resolved.name, "Custom code");
    // Whole-definition override: the built-in groups are gone.
    assert_eq!(resolved.groups.len(), 1);

    let all = all_modes(&customs);
    assert_eq!(all[0].name, "Custom code");
    assert!(is_custom("code", &customs));
}

#[test]
fn novel_custom_modes_append_after_builtins_in_supplied_order() {
    let customs = vec![custom_mode("beta"), custom_mode("alpha")];
    let all = all_modes(&customs);
    let builtin_count = builtin_modes().len();
    assert_eq!(all.len(), builtin_count + 2);
    assert_eq!(all[builtin_count].slug, "beta");
    assert_eq!(all[builtin_count + 1].slug, "alpha");
}

#[test]
fn default_mode_is_the_first_builtin() {
    assert_eq!(builtin_modes()[0].slug, default_mode_slug());
}

#[test]
fn tools_for_is_the_union_of_assigned_groups_plus_always_available() {
    let mode = resolve("code", &[]).expect("builtin code mode");
    let tools = tools_for(mode);

    for assignment in &mode.groups {
        for tool in actions_of(assignment.group_name()).expect("known group") {
            assert!(tools.contains(*tool), "union should carry {tool}");
        }
    }
    for tool in ALWAYS_AVAILABLE_TOOLS {
        assert!(tools.contains(*tool));
    }
}

#[test]
fn custom_mode_descriptors_deserialize_from_yaml() {
    let raw = r#"
- slug: docs
  name: Docs
  role_definition: You write documentation.
  groups:
    - read
    - - edit
      - file_regex: "\\.md$"
        description: Markdown files only
- slug: ops
  name: Ops
  role_definition: You operate infrastructure.
  groups:
    - command
  when_to_use: Incident response.
"#;
    let customs: Vec<ModeConfig> = serde_yaml::from_str(raw).expect("parse custom modes");
    assert_eq!(customs.len(), 2);
    assert_eq!(
        customs[0].groups[1]
            .options()
            .and_then(|options| options.description.as_deref()),
        Some("Markdown files only")
    );
    assert_eq!(customs[1].when_to_use.as_deref(), Some("Incident response."));

    let tools = tools_for(&customs[0]);
    assert!(tools.contains("write_to_file"));
    assert!(tools.contains("read_file"));
}
