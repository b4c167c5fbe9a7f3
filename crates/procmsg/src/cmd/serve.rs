use procmsg_frame::Payload;
use procmsg_rpc::Registry;
use serde_json::{json, Value};

use crate::cmd::ServeArgs;
use crate::exit::{io_error, rpc_error, CliError, CliResult, SUCCESS, USAGE};

/// Built-in demo target names.
const BUILTIN_TARGETS: &[&str] = &["echo", "ping", "count"];

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let registry = build_registry(&args)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| io_error("runtime setup failed", err))?;
    runtime.block_on(serve_until_shutdown(registry))
}

async fn serve_until_shutdown(registry: Registry) -> CliResult<i32> {
    let mut targets: Vec<&str> = registry.names().collect();
    targets.sort_unstable();
    tracing::info!(targets = ?targets, "serving on stdio");

    tokio::select! {
        result = procmsg_rpc::serve(registry) => match result {
            Ok(()) => {
                tracing::info!("input closed; done");
                Ok(SUCCESS)
            }
            Err(err) => Err(rpc_error("serve failed", err)),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted; shutting down");
            Ok(SUCCESS)
        }
    }
}

fn build_registry(args: &ServeArgs) -> CliResult<Registry> {
    for name in &args.target {
        if !BUILTIN_TARGETS.contains(&name.as_str()) {
            return Err(CliError::new(
                USAGE,
                format!("unknown built-in target: {name}"),
            ));
        }
    }

    let wanted = |name: &str| args.target.is_empty() || args.target.iter().any(|t| t == name);
    let mut registry = Registry::new();

    if wanted("echo") {
        registry.register_fn("echo", Ok);
    }
    if wanted("ping") {
        registry.register_fn("ping", |_payload| {
            Ok(Payload::from_iter([("pong".to_string(), json!(true))]))
        });
    }
    if wanted("count") {
        registry.register("count", |payload, mut sender| {
            let upto = payload.get("upto").and_then(Value::as_u64).unwrap_or(3);
            for n in 1..=upto {
                sender.progress(Payload::from_iter([("n".to_string(), json!(n))]));
            }
            sender.resolve(Payload::from_iter([("counted".to_string(), json!(upto))]));
            Ok(())
        });
    }

    Ok(registry)
}
