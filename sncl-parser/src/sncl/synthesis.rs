//! Descriptor and connector synthesis
//!
//! Neither descriptors nor connectors are written by the author. A descriptor is
//! derived from every media-to-region binding and a connector from the shape of
//! every link. Both ids are pure functions of their input, so equal shapes map
//! onto one head entry.
//!
//! Connector ids are built from the condition roles joined by `_`, then for each
//! action role (in first-occurrence order) `_<role>`, an `N` suffix when the role
//! occurs more than once, and `_<param>` for each property name bound to it:
//!
//!     onBegin do start m end                   -> onBegin_start
//!     onEnd do start a end start b end         -> onEnd_startN
//!     onBegin do set t.size value: 10 end end  -> onBegin_set_value
//!
//! Condition parameters and link properties are not part of the id, so links that
//! share an id can still need different parameters. The head keeps one connector
//! per id and merges every such link into it.

use crate::sncl::ast::{
    is_control_button, BodyElement, Condition, ConditionRole, Connector, Descriptor, Link,
    Properties, RoleBinding,
};
use crate::sncl::error::Result;
use crate::sncl::symbols::{HeadElement, SymbolTable};
use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// Property carrying the remote-control key of an `onSelection` condition.
pub const KEY_VALUE_PROPERTY: &str = "_keyValue";

const DESCRIPTOR_PREFIX: &str = "__desc__";

pub fn descriptor_id(region: &str) -> String {
    format!("{DESCRIPTOR_PREFIX}{region}")
}

pub fn descriptor_for(region: &str) -> Descriptor {
    Descriptor {
        id: descriptor_id(region),
        region: region.to_string(),
    }
}

fn bindings<'a, R, I>(binds: I) -> IndexMap<R, RoleBinding>
where
    R: Copy + Eq + Hash + 'a,
    I: IntoIterator<Item = (R, &'a Properties)>,
{
    let mut result: IndexMap<R, RoleBinding> = IndexMap::new();
    for (role, properties) in binds {
        let binding = result.entry(role).or_default();
        binding.count += 1;
        binding.parameters.extend(properties.keys().cloned());
    }
    result
}

fn merge_bindings<R: Eq + Hash>(
    into: &mut IndexMap<R, RoleBinding>,
    from: IndexMap<R, RoleBinding>,
) {
    for (role, binding) in from {
        let merged = into.entry(role).or_default();
        merged.count = merged.count.max(binding.count);
        merged.parameters.extend(binding.parameters);
    }
}

impl Connector {
    /// Derive the connector a link needs.
    pub fn from_link(link: &Link) -> Self {
        let conditions = bindings(link.conditions.iter().map(|bind| (bind.role, &bind.properties)));
        let actions = bindings(link.actions.iter().map(|bind| (bind.role, &bind.properties)));

        let mut parameters = IndexSet::new();
        for binding in actions.values() {
            parameters.extend(binding.parameters.iter().cloned());
        }
        for binding in conditions.values() {
            parameters.extend(binding.parameters.iter().cloned());
        }
        parameters.extend(link.properties.keys().cloned());

        let mut id = conditions
            .keys()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join("_");
        for (role, binding) in &actions {
            id.push('_');
            id.push_str(role.as_str());
            if binding.count > 1 {
                id.push('N');
            }
            for parameter in &binding.parameters {
                id.push('_');
                id.push_str(parameter);
            }
        }

        Connector {
            id,
            conditions,
            actions,
            parameters,
        }
    }

    /// Fold in another connector with the same id. Ids only encode roles and
    /// action parameters, so condition parameters and link properties may differ.
    pub fn merge(&mut self, other: Connector) {
        merge_bindings(&mut self.conditions, other.conditions);
        merge_bindings(&mut self.actions, other.actions);
        self.parameters.extend(other.parameters);
    }

    pub fn declares_key(&self) -> bool {
        self.parameters.contains(KEY_VALUE_PROPERTY)
    }
}

/// Replace a control-button interface on an `onSelection` condition with the
/// `_keyValue` property.
pub fn rewrite_control_key(condition: &mut Condition) {
    if condition.role != ConditionRole::OnSelection {
        return;
    }
    let Some(interface) = condition.interface.as_deref() else {
        return;
    };
    if is_control_button(interface) {
        if let Some(key) = condition.interface.take() {
            condition
                .properties
                .insert(KEY_VALUE_PROPERTY.to_string(), key);
        }
    }
}

/// Fill in derived ids on a body element about to be registered, inserting the
/// descriptors and connectors it needs into the head. Recurses into contexts.
pub fn materialize(element: &mut BodyElement, table: &mut SymbolTable) -> Result<()> {
    match element {
        BodyElement::Media(media) => {
            if let Some(region) = &media.region {
                let descriptor = descriptor_for(region);
                media.descriptor = Some(descriptor.id.clone());
                table.add_head(HeadElement::Descriptor(descriptor))?;
            }
        }
        BodyElement::Link(link) => {
            let connector = Connector::from_link(link);
            link.connector = connector.id.clone();
            table.add_head(HeadElement::Connector(connector))?;
        }
        BodyElement::Context(context) => {
            for child in &mut context.children {
                materialize(child, table)?;
            }
        }
        BodyElement::Port(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncl::ast::{Action, ActionRole, Bind};

    fn bind<R>(role: R, component: &str, properties: &[(&str, &str)]) -> Bind<R> {
        Bind {
            role,
            line: 1,
            component: component.to_string(),
            interface: None,
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn link(conditions: Vec<Condition>, actions: Vec<Action>) -> Link {
        Link {
            line: 1,
            conditions,
            actions,
            properties: Properties::new(),
            connector: String::new(),
        }
    }

    #[test]
    fn descriptor_ids_are_prefixed() {
        let descriptor = descriptor_for("screen");
        assert_eq!(descriptor.id, "__desc__screen");
        assert_eq!(descriptor.region, "screen");
    }

    #[test]
    fn simple_connector_id() {
        let link = link(
            vec![bind(ConditionRole::OnBegin, "a", &[])],
            vec![bind(ActionRole::Start, "b", &[])],
        );
        assert_eq!(Connector::from_link(&link).id, "onBegin_start");
    }

    #[test]
    fn repeated_actions_and_parameters() {
        let link = link(
            vec![bind(ConditionRole::OnEnd, "a", &[])],
            vec![
                bind(ActionRole::Start, "b", &[]),
                bind(ActionRole::Start, "c", &[]),
                bind(ActionRole::Set, "d", &[("value", "10"), ("delay", "1s")]),
            ],
        );
        let connector = Connector::from_link(&link);
        assert_eq!(connector.id, "onEnd_startN_set_value_delay");
        assert_eq!(connector.actions[&ActionRole::Start].count, 2);
        assert_eq!(
            connector.parameters.iter().collect::<Vec<_>>(),
            vec!["value", "delay"]
        );
    }

    #[test]
    fn link_and_condition_properties_become_parameters() {
        let mut link = link(
            vec![bind(ConditionRole::OnSelection, "a", &[("_keyValue", "RED")])],
            vec![bind(ActionRole::Stop, "b", &[])],
        );
        link.properties.insert("delay".to_string(), "2s".to_string());
        let connector = Connector::from_link(&link);
        assert_eq!(connector.id, "onSelection_stop");
        assert!(connector.declares_key());
        assert!(connector.parameters.contains("delay"));
    }

    #[test]
    fn merging_keeps_parameters_of_both_links() {
        let keyed = link(
            vec![bind(ConditionRole::OnSelection, "menu", &[("_keyValue", "RED")])],
            vec![bind(ActionRole::Start, "video", &[])],
        );
        let mut delayed = link(
            vec![bind(ConditionRole::OnSelection, "menu", &[])],
            vec![bind(ActionRole::Start, "video", &[])],
        );
        delayed.properties.insert("delay".to_string(), "2s".to_string());

        let mut connector = Connector::from_link(&delayed);
        let other = Connector::from_link(&keyed);
        assert_eq!(connector.id, other.id);

        connector.merge(other);
        assert!(connector.declares_key());
        assert_eq!(
            connector.parameters.iter().collect::<Vec<_>>(),
            vec!["delay", "_keyValue"]
        );
        assert!(connector.conditions[&ConditionRole::OnSelection]
            .parameters
            .contains("_keyValue"));
        assert_eq!(connector.actions[&ActionRole::Start].count, 1);
    }

    #[test]
    fn merging_keeps_the_larger_count() {
        let twice = link(
            vec![bind(ConditionRole::OnEnd, "a", &[])],
            vec![bind(ActionRole::Stop, "b", &[]), bind(ActionRole::Stop, "c", &[])],
        );
        let thrice = link(
            vec![bind(ConditionRole::OnEnd, "a", &[])],
            vec![
                bind(ActionRole::Stop, "b", &[]),
                bind(ActionRole::Stop, "c", &[]),
                bind(ActionRole::Stop, "d", &[]),
            ],
        );
        let mut connector = Connector::from_link(&thrice);
        connector.merge(Connector::from_link(&twice));
        assert_eq!(connector.id, "onEnd_stopN");
        assert_eq!(connector.actions[&ActionRole::Stop].count, 3);
    }

    #[test]
    fn control_keys_are_rewritten_on_selection_only() {
        let mut selection = bind(ConditionRole::OnSelection, "menu", &[]);
        selection.interface = Some("RED".to_string());
        rewrite_control_key(&mut selection);
        assert_eq!(selection.interface, None);
        assert_eq!(selection.properties["_keyValue"], "RED");

        let mut begin = bind(ConditionRole::OnBegin, "menu", &[]);
        begin.interface = Some("RED".to_string());
        rewrite_control_key(&mut begin);
        assert_eq!(begin.interface.as_deref(), Some("RED"));

        let mut anchor = bind(ConditionRole::OnSelection, "video", &[]);
        anchor.interface = Some("segment".to_string());
        rewrite_control_key(&mut anchor);
        assert_eq!(anchor.interface.as_deref(), Some("segment"));
    }
}
