use caption_compat::{
    AssociativeSet, Capability, CompatEnvironment, Dom, Error, HostProfile, Result, Value,
};

#[test]
fn conforming_environment_upholds_the_documented_surface() {
    let env = CompatEnvironment::conforming();

    assert_eq!(env.trim_leading("  ab c "), "ab c ");
    assert!(env.starts_with("hello", "he"));
    assert!(!env.starts_with("hello", "lo"));
    assert!(env.ends_with("hello", "lo"));
    assert!(!env.ends_with("hello", "he"));
    assert_eq!(env.parse_integer("010", None), 10.0);
    assert_eq!(env.parse_integer("0x10", None), 16.0);
    assert_eq!(env.parse_integer("10", Some(2)), 2.0);
}

#[test]
fn detection_is_repeatable_and_side_effect_free() {
    let first = CompatEnvironment::conforming();
    let second = CompatEnvironment::conforming();

    assert_eq!(first.applied_patches(), second.applied_patches());
    assert_eq!(first.trim_leading("\u{FEFF}x"), second.trim_leading("\u{FEFF}x"));
}

#[test]
fn prefix_host_that_confuses_contains_with_starts_with_is_replaced() {
    let host = HostProfile {
        starts_with: Some(Box::new(|value, probe| value.contains(probe))),
        ..HostProfile::default()
    };
    let env = CompatEnvironment::from_host(host);

    assert!(env.is_patched(Capability::StartsWith));
    assert!(!env.starts_with("hello", "lo"));
}

#[test]
fn suffix_host_that_only_compares_last_char_is_replaced() {
    let host = HostProfile {
        ends_with: Some(Box::new(|value, probe| {
            value.chars().last() == probe.chars().last()
        })),
        ..HostProfile::default()
    };
    let env = CompatEnvironment::from_host(host);

    assert!(env.is_patched(Capability::EndsWith));
    assert!(!env.ends_with("hello", "xo"));
    assert!(env.ends_with("hello", "llo"));
}

#[test]
fn environment_set_keeps_numeric_and_textual_members_distinct() -> Result<()> {
    let env = CompatEnvironment::conforming();
    let mut set = env.new_set();

    set.add(Value::Number(5))?;
    set.add(Value::String("5".into()))?;

    assert!(set.has(&Value::Number(5)));
    assert!(set.has(&Value::String("5".into())));

    let members: Vec<Value> = set.values()?.collect();
    assert_eq!(members.len(), 2);
    assert!(members.contains(&Value::Number(5)));
    assert!(members.contains(&Value::String("5".into())));
    Ok(())
}

#[test]
fn environment_set_rejects_unsupported_members() {
    let env = CompatEnvironment::conforming();
    let mut set = env.new_set();

    assert_eq!(
        set.add(Value::Undefined).err(),
        Some(Error::UnsupportedElement { kind: "undefined" })
    );
    assert!(!set.has(&Value::Undefined));
    assert_eq!(
        set.delete(&Value::Number(5)).err(),
        Some(Error::NotImplemented("delete"))
    );
}

#[test]
fn environment_removal_detaches_parented_elements_only() {
    let env = CompatEnvironment::conforming();
    let mut dom = Dom::new();
    let root = dom.root();
    let parented = dom.create_element(root, "div".into(), Default::default());
    let orphan = dom.create_detached_element("span".into());

    env.remove_element(&mut dom, parented);
    assert_eq!(dom.parent(parented), None);
    assert!(!dom.children(root).contains(&parented));

    env.remove_element(&mut dom, orphan);
    assert_eq!(dom.parent(orphan), None);
}

#[test]
fn host_errors_never_escape_detection() {
    // every probe misbehaves; detection must still complete and patch
    let host = HostProfile {
        trim_leading: Some(Box::new(|_| String::new())),
        starts_with: Some(Box::new(|_, _| true)),
        ends_with: Some(Box::new(|_, _| false)),
        parse_integer: Some(Box::new(|_, _| f64::NAN)),
        remove_element: Some(Box::new(|_, _| {})),
        set_type: None,
    };
    let env = CompatEnvironment::from_host(host);

    for capability in [
        Capability::TrimLeading,
        Capability::StartsWith,
        Capability::EndsWith,
        Capability::ParseInteger,
        Capability::RemoveElement,
        Capability::SetType,
    ] {
        assert!(env.is_patched(capability), "{} not patched", capability.name());
    }
    assert_eq!(env.trim_leading("  x"), "x");
    // the parse shim still delegates digit parsing to the host, so a host
    // parser that is broken beyond radix inference stays broken
    assert!(env.parse_integer("010", None).is_nan());
}

#[test]
fn nan_parse_results_are_reported_as_nan() {
    let env = CompatEnvironment::conforming();
    assert!(env.parse_integer("xyz", None).is_nan());
    assert!(env.parse_integer("10", Some(1)).is_nan());
    assert!(env.parse_integer("", None).is_nan());
}
