use super::*;
use std::collections::HashMap;
use std::fmt;

pub type TrimFn = Box<dyn Fn(&str) -> String>;
pub type PrefixFn = Box<dyn Fn(&str, &str) -> bool>;
pub type ParseIntegerFn = Box<dyn Fn(&str, Option<u32>) -> f64>;
pub type RemoveElementFn = Box<dyn Fn(&mut Dom, NodeId)>;
pub type SetFactoryFn = Box<dyn Fn() -> Box<dyn AssociativeSet>>;

/// Capabilities of the host runtime, as injected. An empty slot means the
/// host has no implementation at all; a filled slot is probed for
/// conformance before it is trusted.
#[derive(Default)]
pub struct HostProfile {
    pub trim_leading: Option<TrimFn>,
    pub starts_with: Option<PrefixFn>,
    pub ends_with: Option<PrefixFn>,
    pub parse_integer: Option<ParseIntegerFn>,
    pub remove_element: Option<RemoveElementFn>,
    pub set_type: Option<SetFactoryFn>,
}

impl fmt::Debug for HostProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostProfile")
            .field("trim_leading", &self.trim_leading.is_some())
            .field("starts_with", &self.starts_with.is_some())
            .field("ends_with", &self.ends_with.is_some())
            .field("parse_integer", &self.parse_integer.is_some())
            .field("remove_element", &self.remove_element.is_some())
            .field("set_type", &self.set_type.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    TrimLeading,
    StartsWith,
    EndsWith,
    ParseInteger,
    SetType,
    SetIteration,
    RemoveElement,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Self::TrimLeading => "trim-leading",
            Self::StartsWith => "starts-with",
            Self::EndsWith => "ends-with",
            Self::ParseInteger => "parse-integer",
            Self::SetType => "set-type",
            Self::SetIteration => "set-iteration",
            Self::RemoveElement => "remove-element",
        }
    }
}

/// The uniform runtime surface. Built once from a [`HostProfile`]; every
/// slot holds either the host's own conformant implementation or the
/// installed replacement, and call sites cannot tell which.
///
/// Slots are plain boxed closures with no `Sync` bound; an environment must
/// not be shared across concurrent writers without external synchronization.
pub struct CompatEnvironment {
    trim_leading: TrimFn,
    starts_with: PrefixFn,
    ends_with: PrefixFn,
    parse_integer: ParseIntegerFn,
    remove_element: RemoveElementFn,
    set_factory: SetFactoryFn,
    applied: Vec<Capability>,
}

impl fmt::Debug for CompatEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatEnvironment")
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}

impl CompatEnvironment {
    /// Environment with every capability shimmed, for hosts that bring
    /// nothing of their own.
    pub fn conforming() -> Self {
        Self::from_host(HostProfile::default())
    }

    /// Probes every host capability once and installs replacements for the
    /// absent or non-conformant ones. Patches are independent; the order
    /// they are applied in is not observable.
    pub fn from_host(host: HostProfile) -> Self {
        let mut applied = Vec::new();

        let trim_leading: TrimFn = match host.trim_leading {
            Some(native) if trim_conforms(&native) => native,
            _ => {
                applied.push(Capability::TrimLeading);
                Box::new(string_ops::trim_leading)
            }
        };

        let starts_with: PrefixFn = match host.starts_with {
            Some(native) if prefix_conforms(&native) => native,
            _ => {
                applied.push(Capability::StartsWith);
                Box::new(string_ops::starts_with)
            }
        };

        let ends_with: PrefixFn = match host.ends_with {
            Some(native) if suffix_conforms(&native) => native,
            _ => {
                applied.push(Capability::EndsWith);
                Box::new(string_ops::ends_with)
            }
        };

        let parse_integer: ParseIntegerFn = match host.parse_integer {
            Some(native) => {
                if parse_integer_conforms(&native) {
                    native
                } else {
                    // Keep the host's digit parser; only radix resolution
                    // is replaced.
                    applied.push(Capability::ParseInteger);
                    Box::new(move |src, radix| {
                        let radix = numeric::resolved_radix(src, radix);
                        native(src, Some(radix))
                    })
                }
            }
            None => {
                applied.push(Capability::ParseInteger);
                Box::new(numeric::parse_integer)
            }
        };

        let remove_element: RemoveElementFn = match host.remove_element {
            Some(native) if remove_element_conforms(&native) => native,
            _ => {
                applied.push(Capability::RemoveElement);
                Box::new(|dom, node| dom.detach(node))
            }
        };

        let set_factory: SetFactoryFn = match host.set_type {
            Some(factory) => {
                let support = probe_set_support(&factory);
                if support.iteration {
                    factory
                } else if support.enumeration {
                    applied.push(Capability::SetIteration);
                    Box::new(move || Box::new(EnumeratedSetAdapter::new(factory())))
                } else {
                    applied.push(Capability::SetType);
                    Box::new(|| Box::new(FallbackSet::new()))
                }
            }
            None => {
                applied.push(Capability::SetType);
                Box::new(|| Box::new(FallbackSet::new()))
            }
        };

        Self {
            trim_leading,
            starts_with,
            ends_with,
            parse_integer,
            remove_element,
            set_factory,
            applied,
        }
    }

    pub fn trim_leading(&self, src: &str) -> String {
        (self.trim_leading)(src)
    }

    pub fn starts_with(&self, value: &str, prefix: &str) -> bool {
        (self.starts_with)(value, prefix)
    }

    pub fn ends_with(&self, value: &str, suffix: &str) -> bool {
        (self.ends_with)(value, suffix)
    }

    pub fn parse_integer(&self, src: &str, radix: Option<u32>) -> f64 {
        (self.parse_integer)(src, radix)
    }

    pub fn remove_element(&self, dom: &mut Dom, node: NodeId) {
        (self.remove_element)(dom, node)
    }

    pub fn new_set(&self) -> Box<dyn AssociativeSet> {
        (self.set_factory)()
    }

    /// Patches that were applied at construction, in no particular order.
    pub fn applied_patches(&self) -> &[Capability] {
        &self.applied
    }

    pub fn is_patched(&self, capability: Capability) -> bool {
        self.applied.contains(&capability)
    }
}

// Detectors are pure predicates over the probed slot. Absence and
// misbehavior both collapse into `false`; they never produce an error.

fn trim_conforms(native: &TrimFn) -> bool {
    const PROBE: &str = " \t\u{A0}\u{FEFF}ab c \u{FEFF}";
    native(PROBE) == string_ops::trim_leading(PROBE)
        && native("ab c ") == "ab c "
        && native("") == ""
}

fn prefix_conforms(native: &PrefixFn) -> bool {
    native("hello", "he")
        && !native("hello", "lo")
        && native("hello", "")
        && !native("he", "hello")
}

fn suffix_conforms(native: &PrefixFn) -> bool {
    native("hello", "lo")
        && !native("hello", "he")
        && native("hello", "")
        && !native("lo", "hello")
}

fn parse_integer_conforms(native: &ParseIntegerFn) -> bool {
    native("010", None) == 10.0 && native("0x10", None) == 16.0 && native("10", Some(2)) == 2.0
}

fn remove_element_conforms(native: &RemoveElementFn) -> bool {
    let mut dom = Dom::new();
    let root = dom.root();
    let parented = dom.create_element(root, "div".into(), HashMap::new());
    let detached = dom.create_detached_element("span".into());

    native(&mut dom, detached);
    if dom.parent(detached).is_some() {
        return false;
    }

    native(&mut dom, parented);
    dom.parent(parented).is_none() && !dom.children(root).contains(&parented)
}

struct SetSupport {
    iteration: bool,
    enumeration: bool,
}

fn probe_set_support(factory: &SetFactoryFn) -> SetSupport {
    let mut probe = factory();
    // a hostile probe add is itself a non-conformance signal we can ignore
    let _ = probe.add(Value::Number(1));
    let iteration = probe.values().is_ok();
    let enumeration = probe.for_each(&mut |_| {}).is_ok();
    SetSupport {
        iteration,
        enumeration,
    }
}
