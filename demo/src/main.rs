//! routegate — command-line tool
//!
//! Checks a path against a route permission registry, lists and validates
//! registries, and runs the dashboard navigation scenarios.
//!
//! Usage:
//!   cargo run -p demo -- check --path /dashboard/users --cap users.manage
//!   cargo run -p demo -- check --path /dashboard/blog --role editor --json
//!   cargo run -p demo -- rules --registry policies/dashboard.toml
//!   cargo run -p demo -- validate --registry my-routes.toml --override local.toml
//!   cargo run -p demo -- run-all

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use routegate_contracts::{
    capability::{Capability, CapabilitySet},
    error::{GuardError, GuardResult},
    path::normalize_path,
};
use routegate_core::{traits::RouteResolver, EnforcementGate};
use routegate_ref_dashboard::{
    scenarios::{admin_tour, editor_tour, signed_out, ScenarioReport},
    Role, DASHBOARD_POLICY,
};
use routegate_registry::{PermissionRegistry, RegistryConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// routegate — route permission checks for the back-office dashboard.
#[derive(Parser)]
#[command(
    name = "routegate",
    about = "Route permission registry and enforcement gate tool",
    long_about = "Checks paths against a route permission registry, lists and validates\n\
                  registries, and runs the dashboard navigation scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RegistryArgs {
    /// Registry TOML file. Defaults to the built-in dashboard table.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Override file layered on top of the registry; may be repeated.
    #[arg(long = "override", value_name = "FILE")]
    overrides: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Decide whether a caller may enter a path.
    Check {
        /// The path to check. Normalized before lookup.
        #[arg(long)]
        path: String,

        /// A capability the caller holds; may be repeated.
        #[arg(long = "cap", value_name = "CAPABILITY")]
        caps: Vec<String>,

        /// Add the capabilities of a back-office role (admin, editor, sales, guest).
        #[arg(long)]
        role: Option<Role>,

        /// Print the gate outcome as JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// List registry rules in match-priority order.
    Rules {
        /// Print the rules as JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// Load and validate a registry, reporting the first problem found.
    Validate {
        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// Run all three dashboard scenarios in sequence.
    RunAll,
    /// Scenario 1: an admin visits every section.
    AdminTour,
    /// Scenario 2: an editor strays outside the CMS, then is promoted.
    EditorTour,
    /// Scenario 3: a visitor without a session tries the dashboard.
    SignedOut,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-lookup output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check { path, caps, role, json, registry } => {
            run_check(&path, &caps, role, json, &registry)
        }
        Command::Rules { json, registry } => run_rules(json, &registry),
        Command::Validate { registry } => run_validate(&registry),
        Command::RunAll => run_scenarios(&[
            admin_tour::run_scenario,
            editor_tour::run_scenario,
            signed_out::run_scenario,
        ]),
        Command::AdminTour => run_scenarios(&[admin_tour::run_scenario]),
        Command::EditorTour => run_scenarios(&[editor_tour::run_scenario]),
        Command::SignedOut => run_scenarios(&[signed_out::run_scenario]),
    };

    if let Err(e) = result {
        eprintln!("routegate: {}", e);
        std::process::exit(1);
    }
}

// ── Registry loading ──────────────────────────────────────────────────────────

fn load_registry(args: &RegistryArgs) -> GuardResult<PermissionRegistry> {
    let mut config = match &args.registry {
        Some(path) => RegistryConfig::from_file(path)?,
        None => RegistryConfig::from_toml_str(DASHBOARD_POLICY)?,
    };
    for path in &args.overrides {
        debug!(path = %path.display(), "applying registry override");
        config = config.with_overrides(RegistryConfig::from_file(path)?);
    }
    PermissionRegistry::from_config(&config)
}

fn registry_label(args: &RegistryArgs) -> String {
    let base = args
        .registry
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in dashboard table".to_string());
    if args.overrides.is_empty() {
        base
    } else {
        let overrides: Vec<String> =
            args.overrides.iter().map(|p| p.display().to_string()).collect();
        format!("{} + {}", base, overrides.join(" + "))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> GuardResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| GuardError::ConfigError {
        reason: format!("failed to encode JSON output: {}", e),
    })
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_check(
    raw_path: &str,
    caps: &[String],
    role: Option<Role>,
    json: bool,
    args: &RegistryArgs,
) -> GuardResult<()> {
    let registry: Arc<dyn RouteResolver> = Arc::new(load_registry(args)?);

    let mut held: CapabilitySet = caps.iter().map(|c| Capability::new(c.as_str())).collect();
    if let Some(role) = role {
        for cap in role.capabilities().all() {
            held.grant(cap.clone());
        }
    }

    let path = normalize_path(raw_path);
    let outcome = EnforcementGate::new(registry).evaluate(&path, Some(&held));

    if json {
        println!("{}", to_json(&outcome)?);
        return Ok(());
    }

    println!("path:     {}", outcome.path);
    match &outcome.decision.required {
        Some(required) => println!("requires: any of {}", required),
        None => println!("requires: nothing (unguarded)"),
    }
    let held_names: Vec<&str> = held.sorted().into_iter().map(Capability::as_str).collect();
    println!("holds:    [{}]", held_names.join(", "));
    match outcome.redirect_target() {
        None => println!("verdict:  ALLOW"),
        Some(to) => println!("verdict:  DENY (redirect to {})", to),
    }
    Ok(())
}

fn run_rules(json: bool, args: &RegistryArgs) -> GuardResult<()> {
    let registry = load_registry(args)?;

    if json {
        println!("{}", to_json(&registry.rules())?);
        return Ok(());
    }

    println!("Registry: {}", registry_label(args));
    println!("Denied callers go to: {}", registry.unauthorized_path());
    println!();
    for (priority, rule) in registry.rules().iter().enumerate() {
        println!(
            "  {:>2}. {:<28} any of {}",
            priority + 1,
            rule.pattern,
            rule.required
        );
        if let Some(description) = &rule.description {
            println!("      {}", description);
        }
    }
    Ok(())
}

fn run_validate(args: &RegistryArgs) -> GuardResult<()> {
    let registry = load_registry(args)?;
    println!(
        "{}: OK ({} rules, unauthorized destination {})",
        registry_label(args),
        registry.len(),
        registry.unauthorized_path()
    );
    Ok(())
}

fn run_scenarios(scenarios: &[fn() -> GuardResult<ScenarioReport>]) -> GuardResult<()> {
    println!();
    println!("routegate — dashboard navigation scenarios");
    println!("==========================================");
    println!();
    println!("Per navigation:");
    println!("  [1] Normalize the path (query, fragment, trailing '/')");
    println!("  [2] Read the caller's capabilities (none if there is no session)");
    println!("  [3] First matching rule decides; any one listed capability grants access");
    println!("  [4] Denied: render nothing, redirect once per newly denied page");
    println!("  [5] Append the decision to a SHA-256 hash-chained log");
    println!();

    let mut failed = Vec::new();
    for run in scenarios {
        let report = run()?;
        if !report.passed() {
            failed.push(report.name);
        }
    }

    if failed.is_empty() {
        println!("All selected scenarios completed as expected.");
        Ok(())
    } else {
        Err(GuardError::ConfigError {
            reason: format!("scenario(s) did not match the route table: {}", failed.join(", ")),
        })
    }
}
