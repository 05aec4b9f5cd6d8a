//! Demo schema server with a couple of sample resources.
//!
//! ```text
//! cargo run -p adminforge-server --bin demo-server -- --port 3000
//! curl localhost:3000/api/admin/article/create
//! ```

use adminforge_core::fields::{self, FieldOption, UploadMode};
use adminforge_core::{Align, KeyConfig, ResourceBuilder, Rule, View};
use adminforge_server::{init_tracing, AdminServer, ResourceRegistry, ServerConfig};
use clap::Parser;
use serde_json::{json, Value};
use tracing::info;

fn article() -> ResourceBuilder {
    ResourceBuilder::new("article", "Articles")
        .field(
            fields::text("title", "Title")
                .rules(vec![Rule::required("title is required")])
                .creation_rules(vec![Rule::unique("articles", "title", "title already used")])
                .update_rules(vec![Rule::max(120, "at most 120 characters")])
                .editable(true)
                .column(|c| c.ellipsis(true).copyable(true)),
        )
        .field(
            fields::select("status", "Status")
                .options(vec![
                    FieldOption::new("Draft", 0),
                    FieldOption::new("Published", 1),
                    FieldOption::new("Archived", 2),
                ])
                .default_value(0)
                .when("1", || {
                    fields::text("published_at", "Published at")
                        .rules(vec![Rule::required("publish date is required")])
                        .build(&KeyConfig::default())
                })
                .when_op(">=", 2, || json!("archived articles are read-only")),
        )
        .field(
            fields::select("tags", "Tags")
                .mode("tags")
                .options(vec![FieldOption::new("News", "news"), FieldOption::new("Howto", "howto")])
                .hide_from(View::Index, true),
        )
        .field(
            fields::image("cover", "Cover")
                .upload_mode(UploadMode::Single)
                .only_on_forms(),
        )
        .field(
            fields::text("views", "Views")
                .except_on_forms()
                .column(|c| c.align(Align::Right).sorter(true))
                .callback(|v| json!(format!("{} views", v.as_u64().unwrap_or_default()))),
        )
}

fn user() -> ResourceBuilder {
    ResourceBuilder::new("user", "Users")
        .field(fields::text("name", "Name").rules(vec![Rule::required("name is required")]))
        .field(
            fields::text("email", "Email")
                .rules(vec![Rule::required("email is required"), Rule::email("not an email")]),
        )
        .field(
            fields::select("role", "Role")
                .options(vec![FieldOption::new("Admin", "admin"), FieldOption::new("Editor", "editor")])
                .when_op("in", vec!["admin"], || Value::Bool(true)),
        )
        .field(fields::image("avatar", "Avatar").limit_num(1).only_on(View::Update))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_format)?;

    let keys = config.key_config();
    let registry = ResourceRegistry::builder()
        .define(article().key_config(keys.clone()))?
        .define(user().key_config(keys))?
        .build();

    let mut server = AdminServer::new(config, registry);
    let port = server.start().await?;
    info!(port, "demo server listening");

    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for ctrl-c");
            }
        })
        .await
}
