//! Command-line walkthrough of the access manager.
//!
//! Builds a registry over an in-memory document store and prints what the
//! chosen subject may do:
//!
//! - `docs.doc` is registered with an owner-based compound plugin
//! - `docs.note` has no registration and falls back to the default plugin
//!
//! ```text
//! access-demo --subject bob --ability changeable
//! access-demo --model note --subject alice --permission docs.view_note
//! ACCESS__DEFAULT_PLUGIN=missing access-demo   # fails at startup
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use access_manager::{AccessManager, AccessManagerConfig, AccessRegistry};
use access_manager_sdk::{
    Ability, ApplyAblePlugin, Attributes, CompoundPlugin, EntityType, InstanceSet, MemorySet,
    PluginCatalog, VerifyAblePlugin,
};
use access_security::{Filter, FilterValue, Record, RequestContext, properties};
use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const PUBLIC: &str = "public";

#[derive(Parser, Debug)]
#[command(name = "access-demo", version, about = "Ask the access manager what a subject may do")]
struct Cli {
    /// YAML config file; `ACCESS__*` environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subject making the request
    #[arg(short, long, value_enum, default_value_t = Subject::Alice)]
    subject: Subject,

    /// Entity to query
    #[arg(short, long, value_enum, default_value_t = Model::Doc)]
    model: Model,

    /// Ability to check, e.g. `visible`, `changeable` or `appendable`
    #[arg(short, long, default_value = "visible")]
    ability: String,

    /// Permission granted to the subject, in `app_label.codename` form
    #[arg(short, long = "permission")]
    permissions: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Subject {
    Alice,
    Bob,
    Admin,
    Guest,
}

impl Subject {
    fn context(self, permissions: Vec<String>) -> RequestContext {
        let builder = RequestContext::builder().permissions(permissions);
        let builder = match self {
            Self::Alice => builder.subject_id(alice()),
            Self::Bob => builder.subject_id(bob()),
            Self::Admin => builder.subject_id(Uuid::from_u128(3)).superuser(true),
            Self::Guest => builder,
        };
        builder.build()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Model {
    Doc,
    Note,
}

impl Model {
    fn entity(self) -> EntityType {
        match self {
            Self::Doc => EntityType::new("docs", "doc"),
            Self::Note => EntityType::new("docs", "note"),
        }
    }
}

fn alice() -> Uuid {
    Uuid::from_u128(1)
}

fn bob() -> Uuid {
    Uuid::from_u128(2)
}

#[derive(Clone, Debug)]
struct Entry {
    id: i64,
    title: &'static str,
    owner: Uuid,
    public: bool,
}

impl Record for Entry {
    fn resolve_property(&self, property: &str) -> Vec<FilterValue> {
        match property {
            properties::RESOURCE_ID => vec![self.id.into()],
            properties::OWNER_ID => vec![self.owner.into()],
            PUBLIC => vec![self.public.into()],
            _ => Vec::new(),
        }
    }
}

type Entries = MemorySet<Entry>;

fn store(model: Model) -> Entries {
    let entry = |id: i64, title: &'static str, owner: Uuid, public: bool| Entry {
        id,
        title,
        owner,
        public,
    };
    let records = match model {
        Model::Doc => vec![
            entry(1, "roadmap", alice(), true),
            entry(2, "salary review", alice(), false),
            entry(3, "release notes", bob(), true),
            entry(4, "incident log", bob(), false),
        ],
        Model::Note => vec![
            entry(10, "standup", alice(), false),
            entry(11, "retro", bob(), false),
        ],
    };
    MemorySet::new(model.entity(), records)
}

/// Authenticated users may create documents they own; everyone sees public
/// documents and their own; only owners change or delete.
fn document_plugin() -> CompoundPlugin<Entries> {
    let own = |set: Entries, ctx: &RequestContext| {
        set.filter(Filter::eq(properties::OWNER_ID, ctx.subject_id()))
    };

    CompoundPlugin::new()
        .with(VerifyAblePlugin::new().rule(
            Ability::APPENDABLE,
            |_, ctx, attrs: &mut Attributes| {
                attrs.insert(properties::OWNER_ID, ctx.subject_id());
                ctx.is_authenticated()
            },
        ))
        .with(
            ApplyAblePlugin::new()
                .rule(Ability::VISIBLE, |set: Entries, ctx| {
                    set.filter(Filter::any(vec![
                        Filter::eq(PUBLIC, true),
                        Filter::eq(properties::OWNER_ID, ctx.subject_id()),
                    ]))
                })
                .rule(Ability::CHANGEABLE, own)
                .rule(Ability::DELETEABLE, own),
        )
}

fn build_registry(config: &AccessManagerConfig) -> anyhow::Result<Arc<AccessRegistry<Entries>>> {
    let mut catalog = PluginCatalog::<Entries>::new();
    permission_access_plugin::register_into(&mut catalog);

    let registry = AccessRegistry::builder(catalog)
        .config(config)
        .register(Model::Doc.entity(), Arc::new(document_plugin()))
        .build()
        .context("building access registry")?;
    Ok(Arc::new(registry))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AccessManagerConfig::load(cli.config.as_deref()).context("loading config")?;
    let registry = build_registry(&config)?;
    let ability = Ability::parse(&cli.ability)?;
    let ctx = cli.subject.context(cli.permissions);
    let manager = AccessManager::new(registry, store(cli.model));

    tracing::info!(
        entity = %manager.entity(),
        ability = %ability,
        subject = %ctx.subject_id(),
        "Checking access"
    );

    let report = if ability == Ability::APPENDABLE {
        let appendable = manager.appendable(&ctx);
        json!({
            "entity": manager.entity().to_string(),
            "ability": ability.as_str(),
            "allowed": appendable.allowed,
            "defaults": serde_json::Value::Object(
                appendable.attributes.into_inner().into_iter().collect()
            ),
        })
    } else {
        let instances: Vec<_> = manager
            .able(&ability, &ctx)
            .fetch()
            .into_iter()
            .map(|e| json!({ "id": e.id, "title": e.title }))
            .collect();
        json!({
            "entity": manager.entity().to_string(),
            "ability": ability.as_str(),
            "allowed": !instances.is_empty(),
            "instances": instances,
        })
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
