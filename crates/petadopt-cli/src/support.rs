use petadopt_registry::{
    AtomicStoreMutationError, CallerId, ErrorKind, LockPolicy, MemoryStore, Registry,
    RegistryError, mutate_registry_jsonl,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::GlobalArgs;
use crate::config::Config;

/// Resolved per-invocation settings.
#[derive(Debug, Clone)]
pub struct Context {
    pub store_path: PathBuf,
    pub lock: LockPolicy,
    pub caller: Option<CallerId>,
    pub json: bool,
}

impl Context {
    pub fn from_args_or_exit(args: GlobalArgs) -> Self {
        let config = Config::resolve(args.config.as_deref()).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });
        init_tracing(&config.log_filter);

        let store_path = args.store.unwrap_or(config.store_path);
        debug!(
            store = %store_path.display(),
            lock_timeout_ms = config.lock_timeout_ms,
            "context resolved"
        );
        Self {
            store_path,
            lock: LockPolicy::with_timeout_ms(config.lock_timeout_ms),
            caller: args.caller.map(CallerId::new),
            json: args.json,
        }
    }

    pub fn caller_or_exit(&self, action: &str) -> CallerId {
        match &self.caller {
            Some(caller) => caller.clone(),
            None => fail(
                self,
                action,
                "caller",
                "caller identity required (--caller or PETADOPT_CALLER)".to_string(),
            ),
        }
    }
}

/// `RUST_LOG` wins over the configured filter. Output goes to stderr.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run one registry operation under the store lock; exits on failure.
pub fn mutate_or_exit<T, F>(ctx: &Context, action: &str, op: F) -> T
where
    F: FnOnce(&mut Registry<&mut MemoryStore>) -> Result<T, RegistryError>,
{
    match mutate_registry_jsonl(&ctx.store_path, ctx.lock, op) {
        Ok(value) => value,
        Err(AtomicStoreMutationError::Mutation(err)) => registry_failure(ctx, action, err),
        Err(err @ AtomicStoreMutationError::Store(_)) => {
            fail(ctx, action, ErrorKind::Store.as_str(), err.to_string())
        }
        Err(err) => fail(ctx, action, "lock", err.to_string()),
    }
}

/// Load the current snapshot and run a read-only query; exits on failure.
pub fn read_or_exit<T, F>(ctx: &Context, action: &str, op: F) -> T
where
    F: FnOnce(&Registry<MemoryStore>) -> Result<T, RegistryError>,
{
    let store = MemoryStore::load_jsonl_or_empty(&ctx.store_path).unwrap_or_else(|e| {
        fail(
            ctx,
            action,
            ErrorKind::Store.as_str(),
            format!("failed to load {}: {e}", ctx.store_path.display()),
        )
    });
    let registry = Registry::new(store);
    op(&registry).unwrap_or_else(|err| registry_failure(ctx, action, err))
}

/// Unwrap a point lookup, treating a miss as `notFound`.
pub fn found_or_exit<T>(
    ctx: &Context,
    action: &str,
    entity: &str,
    id: &str,
    found: Option<T>,
) -> T {
    found.unwrap_or_else(|| {
        fail(
            ctx,
            action,
            ErrorKind::NotFound.as_str(),
            format!("{entity} {id}"),
        )
    })
}

pub fn registry_failure(ctx: &Context, action: &str, err: RegistryError) -> ! {
    fail(ctx, action, err.kind().as_str(), err.detail())
}

pub fn fail(ctx: &Context, action: &str, kind: &str, detail: String) -> ! {
    if ctx.json {
        print_json(&json!({
            "action": action,
            "error": {
                "kind": kind,
                "detail": detail
            }
        }));
    } else {
        eprintln!("error: {kind}: {detail}");
    }
    std::process::exit(1);
}

/// Print one record, either as `{"action", "storePath", <key>: record}` or as
/// a short human summary.
pub fn emit_record<T: Serialize>(
    ctx: &Context,
    action: &str,
    key: &str,
    record: &T,
    summary: &str,
) {
    if ctx.json {
        let mut payload = json!({
            "action": action,
            "storePath": ctx.store_path.display().to_string(),
        });
        payload[key] = to_value(record);
        print_json(&payload);
    } else {
        println!(
            "{}\n  {summary}\n  Path: {}",
            heading(action),
            ctx.store_path.display()
        );
    }
}

pub fn emit_list<T: Serialize>(
    ctx: &Context,
    action: &str,
    rows: &[T],
    line: impl Fn(&T) -> String,
) {
    if ctx.json {
        let items = rows.iter().map(to_value).collect::<Vec<_>>();
        print_json(&json!({
            "action": action,
            "storePath": ctx.store_path.display().to_string(),
            "count": items.len(),
            "items": items
        }));
    } else {
        println!(
            "{}\n  Path: {}\n  Count: {}",
            heading(action),
            ctx.store_path.display(),
            rows.len()
        );
        for row in rows {
            println!("  - {}", line(row));
        }
    }
}

fn heading(action: &str) -> String {
    format!("petadopt {}", action.replace('.', " "))
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("json serialization")
}

fn print_json(payload: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}
