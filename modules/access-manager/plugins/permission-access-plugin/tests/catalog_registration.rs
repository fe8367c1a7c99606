#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use access_manager_sdk::{
    Ability, AccessPlugin, Attributes, EntityType, InstanceSet, MemorySet, PluginCatalog,
};
use access_security::{FilterValue, Record, RequestContext};
use permission_access_plugin::{PLUGIN_ID, PermissionSource, register_into, register_with_source};
use uuid::Uuid;

#[derive(Clone)]
struct Invoice;

impl Record for Invoice {
    fn resolve_property(&self, _property: &str) -> Vec<FilterValue> {
        Vec::new()
    }
}

type Invoices = MemorySet<Invoice>;

fn entity() -> EntityType {
    EntityType::new("billing", "invoice")
}

fn invoices() -> Invoices {
    MemorySet::new(entity(), vec![Invoice, Invoice, Invoice])
}

#[test]
fn registers_under_permission_identifier() {
    let mut catalog = PluginCatalog::<Invoices>::new();
    register_into(&mut catalog);

    assert_eq!(catalog.identifiers(), vec![PLUGIN_ID]);
}

#[test]
fn catalog_plugin_lets_superuser_through() {
    let mut catalog = PluginCatalog::<Invoices>::new();
    register_into(&mut catalog);
    let plugin = (catalog.get(PLUGIN_ID).unwrap())();

    let admin = RequestContext::builder()
        .subject_id(Uuid::new_v4())
        .superuser(true)
        .build();
    let nobody = RequestContext::builder().subject_id(Uuid::new_v4()).build();

    assert!(plugin.verify_able(&Ability::DELETEABLE, &entity(), &admin, &mut Attributes::new()));
    assert_eq!(plugin.apply_able(&Ability::DELETEABLE, invoices(), &admin).count(), 3);
    assert!(!plugin.verify_able(&Ability::DELETEABLE, &entity(), &nobody, &mut Attributes::new()));
    assert!(plugin.apply_able(&Ability::DELETEABLE, invoices(), &nobody).is_empty());
}

/// Grants only what a group table says, ignoring the context's own list.
struct GroupPermissions {
    group: Uuid,
    codenames: Vec<&'static str>,
}

impl PermissionSource for GroupPermissions {
    fn has_permission(&self, ctx: &RequestContext, _entity: &EntityType, codename: &str) -> bool {
        ctx.in_group(self.group) && self.codenames.iter().any(|c| *c == codename)
    }

    fn has_any_permission(&self, ctx: &RequestContext, _entity: &EntityType) -> bool {
        ctx.in_group(self.group) && !self.codenames.is_empty()
    }
}

#[test]
fn custom_source_replaces_context_permissions() {
    let group = Uuid::new_v4();
    let mut catalog = PluginCatalog::<Invoices>::new();
    register_with_source(
        &mut catalog,
        Arc::new(GroupPermissions {
            group,
            codenames: vec!["change_invoice"],
        }),
    );
    let plugin = (catalog.get(PLUGIN_ID).unwrap())();

    let member = RequestContext::builder()
        .subject_id(Uuid::new_v4())
        .group_ids(vec![group])
        .build();
    let outsider = RequestContext::builder()
        .subject_id(Uuid::new_v4())
        .permission("billing.change_invoice")
        .build();

    assert!(plugin.verify_able(&Ability::CHANGEABLE, &entity(), &member, &mut Attributes::new()));
    assert!(plugin.verify_able(&Ability::VISIBLE, &entity(), &member, &mut Attributes::new()));
    assert!(!plugin.verify_able(&Ability::CHANGEABLE, &entity(), &outsider, &mut Attributes::new()));
}
