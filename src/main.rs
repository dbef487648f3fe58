use std::{env, fs::read_to_string, path::Path, process::ExitCode, rc::Rc, sync::Once, time::Instant};

use phic::{
    display_error,
    errors::errors::Error,
    ir::ir::{Checked, Exp},
    lexer::lexer::tokenize,
    lowering::lowering::{analyze, LoweringFacts},
    parser::parser::parse,
    type_checker::type_checker::type_check,
    var_space::var_space::VarSpace,
};
use tracing::info;

static TRACING_INIT: Once = Once::new();

const USAGE: &str = "usage: phic <file> [--emit=typed|facts]";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Emit {
    Typed,
    Facts,
}

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn parse_args(args: &[String]) -> Option<(&str, Emit)> {
    let mut file = None;
    let mut emit = Emit::Typed;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--emit=typed" => emit = Emit::Typed,
            "--emit=facts" => emit = Emit::Facts,
            flag if flag.starts_with("--") => return None,
            path if file.is_none() => file = Some(path),
            _ => return None,
        }
    }

    Some((file?, emit))
}

/// Runs every phase, logging how long each one took.
fn run(source: &str, file_name: &str) -> Result<(VarSpace, Exp<Checked>, LoweringFacts), Error> {
    let start = Instant::now();
    let tokens = tokenize(source.to_string(), Some(file_name.to_string()))?;
    info!(elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let (parser, ast) = parse(tokens, Rc::new(file_name.to_string()));
    let ast = ast?;
    info!(elapsed = ?parse_start.elapsed(), "parsed");

    let check_start = Instant::now();
    let checked = type_check(&ast)?;
    info!(elapsed = ?check_start.elapsed(), "type checked");

    let lowering_start = Instant::now();
    let facts = analyze(&checked)?;
    info!(elapsed = ?lowering_start.elapsed(), total = ?start.elapsed(), "lowering facts computed");

    Ok((parser.vars, checked, facts))
}

fn print_facts(vars: &VarSpace, facts: &LoweringFacts) {
    let name = |id| format!("{} (v{})", vars.name_of(id).unwrap_or("?"), id);

    for member in &facts.members {
        if member.is_branch_target() {
            let needs = member.needs.iter().map(|id| name(*id)).collect::<Vec<_>>();
            println!("{}: branch target, needs {}", name(member.name), needs.join(", "));
        } else {
            println!("{}: routine", name(member.name));
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let Some((file_path, emit)) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let source = match read_to_string(file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: failed to read {}: {}", file_path, error);
            return ExitCode::from(2);
        }
    };

    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());

    match run(&source, &file_name) {
        Ok((vars, checked, facts)) => {
            match emit {
                Emit::Typed => println!("{}\n// : {}", checked, checked.ty()),
                Emit::Facts => print_facts(&vars, &facts),
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            display_error(&error, &source);
            ExitCode::from(1)
        }
    }
}
