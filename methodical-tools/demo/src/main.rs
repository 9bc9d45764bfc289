//! Methodical Demo Binary
//!
//! Run with: `methodical-demo [OPTIONS] [COMMAND]`

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use methodical::{
    DispatchConfig, DispatchContext, DispatchError, GenericFunction, InvokeResult, Object, Role,
    TypeTable, Value,
};

#[derive(Parser)]
#[command(name = "methodical-demo")]
#[command(about = "Walk through multiple dispatch and method combination")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dispatch configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or all walkthroughs
    Run {
        #[arg(value_enum, default_value = "all")]
        scenario: Scenario,
    },
    /// Print the default configuration
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Append lists and scalars, dispatching on both arguments
    Append,
    /// Name mammals through an inherited method and call-next-method
    Mammals,
    /// Trace before, primary, after and around methods
    Combination,
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let scenario = match &cli.command {
        Some(Commands::Config) => {
            print!("{}", DispatchConfig::default().to_toml_string()?);
            return Ok(());
        }
        Some(Commands::Run { scenario }) => *scenario,
        None => Scenario::All,
    };

    let config = build_config(&cli)?;
    debug!(?config, "dispatch configuration");

    if matches!(scenario, Scenario::Append | Scenario::All) {
        run_append(config)?;
    }
    if matches!(scenario, Scenario::Mammals | Scenario::All) {
        run_mammals(config)?;
    }
    if matches!(scenario, Scenario::Combination | Scenario::All) {
        run_combination(config)?;
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<DispatchConfig> {
    match &cli.config {
        Some(path) => DispatchConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => Ok(DispatchConfig::default()),
    }
}

fn concat(left: &Value, right: &Value) -> Value {
    let mut items = match left {
        Value::List(items) => items.clone(),
        other => vec![other.clone()],
    };
    match right {
        Value::List(more) => items.extend(more.iter().cloned()),
        other => items.push(other.clone()),
    }
    Value::List(items)
}

fn run_append(config: DispatchConfig) -> Result<()> {
    info!("append: dispatch on both arguments");

    let append: GenericFunction<Value> =
        GenericFunction::with_config("append", Arc::new(TypeTable::with_builtins()), config);
    append
        .defmethod("Array, Array", |args, _| Ok(Some(concat(&args[0], &args[1]))))?
        .defmethod("*, Array", |args, _| Ok(Some(concat(&args[0], &args[1]))))?
        .defmethod("Array, *", |args, _| Ok(Some(concat(&args[0], &args[1]))))?;

    let calls = [
        vec![Value::numbers([1.0, 2.0]), Value::numbers([3.0, 4.0])],
        vec![Value::Number(1.0), Value::numbers([2.0, 3.0, 4.0])],
        vec![Value::numbers([1.0, 2.0, 3.0]), Value::Number(4.0)],
        vec![Value::Number(1.0), Value::Number(2.0)],
    ];
    for args in calls {
        let shown = format!("{}, {}", args[0], args[1]);
        let selected = append
            .find_method(args.clone())
            .and_then(|effective| effective.primary().map(|entry| entry.signature.to_string()));
        debug!(selected = ?selected, "resolved");

        match append.invoke(args)? {
            InvokeResult::Returned(Some(value)) => println!("append({}) = {}", shown, value),
            InvokeResult::Returned(None) => println!("append({}) returned nothing", shown),
            InvokeResult::NoApplicableMethod(err) => println!("append({}): {}", shown, err),
        }
    }
    Ok(())
}

fn run_mammals(config: DispatchConfig) -> Result<()> {
    info!("mammals: inherited methods and call-next-method");

    let mut table = TypeTable::with_builtins();
    table.define("Mammal", None)?;
    table.define("Rhino", Some("Mammal"))?;
    table.define("Platypus", Some("Mammal"))?;

    let name: GenericFunction<Value> = GenericFunction::with_config("name", Arc::new(table), config);
    name.defmethod("Mammal", |_, _| Ok(Some(Value::text("Mammy"))))?
        .defmethod("Platypus", |_, ctx| {
            let rest = ctx.call_next_method()?;
            let rest = rest.as_ref().and_then(Value::as_str).unwrap_or_default();
            Ok(Some(Value::text(format!("Platty {}", rest))))
        })?;

    let animals = [
        Value::Object(Object::new("Rhino").with_field("horns", Value::Number(1.0))),
        Value::object("Platypus"),
    ];
    for animal in animals {
        let shown = animal.to_string();
        let result = name.call(vec![animal])?;
        println!(
            "name({}) = {}",
            shown,
            result.map_or_else(|| "nothing".to_string(), |v| v.to_string())
        );
    }
    Ok(())
}

type Trace = Arc<Mutex<Vec<String>>>;

fn record(trace: &Trace, ctx: &DispatchContext<Value>, entry: String) -> Result<(), DispatchError> {
    trace
        .lock()
        .map_err(|_| ctx.fail("trace lock poisoned"))?
        .push(entry);
    Ok(())
}

fn run_combination(config: DispatchConfig) -> Result<()> {
    info!("combination: before, primary, after and around methods");

    let mut table = TypeTable::with_builtins();
    table.define("Root", None)?;
    table.define("Mid", Some("Root"))?;
    table.define("Leaf", Some("Mid"))?;

    let trace = Trace::default();

    let visit: GenericFunction<Value> =
        GenericFunction::with_config("visit", Arc::new(table), config);
    for class in ["Leaf", "Mid"] {
        let t = Arc::clone(&trace);
        visit.defmethod_with_role(Role::Before, class, move |_, ctx| {
            record(&t, ctx, format!("before[{}]", class))?;
            Ok(None)
        })?;

        let t = Arc::clone(&trace);
        visit.defmethod(class, move |_, ctx| {
            record(&t, ctx, format!("primary[{}]", class))?;
            if ctx.has_next_method() {
                ctx.call_next_method()
            } else {
                Ok(Some(Value::text(class)))
            }
        })?;

        let t = Arc::clone(&trace);
        visit.defmethod_with_role(Role::After, class, move |_, ctx| {
            record(&t, ctx, format!("after[{}]", class))?;
            Ok(None)
        })?;
    }

    let t = Arc::clone(&trace);
    visit.defmethod_with_role(Role::Around, "Root", move |_, ctx| {
        record(&t, ctx, "around[Root] enter".to_string())?;
        let result = ctx.call_next_method()?;
        record(&t, ctx, "around[Root] exit".to_string())?;
        Ok(result)
    })?;

    let result = visit.call(vec![Value::object("Leaf")])?;
    let trace = trace.lock().map_err(|_| anyhow!("trace lock poisoned"))?;
    for (step, entry) in trace.iter().enumerate() {
        println!("{:>2}. {}", step + 1, entry);
    }
    if let Some(value) = result {
        println!("visit(Leaf {{}}) = {}", value);
    }
    Ok(())
}
