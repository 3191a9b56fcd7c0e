use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use riptide_cpu::ir::debug::{Coordinate, DebugOp, Loc};
use riptide_cpu::ir::{Function, Instr, Module, RuntimeDecl, Type, Value};
use riptide_cpu::lower::{runtime, LaunchCtx, LowerDebugPass};
use riptide_cpu::pass_error_diagnostic;

#[derive(Parser)]
#[command(
    name = "riptide-cpu",
    version,
    about = "Riptide CPU backend — debug-instrumentation lowering"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lower a representative debug-instrumented module and print it
    Demo {
        /// Prefix text for the scalar print ops
        #[arg(long, default_value = "x: ")]
        prefix: String,
        /// Render integer prints in hexadecimal
        #[arg(long)]
        hex: bool,
        /// Treat integer prints as signed
        #[arg(long)]
        signed: bool,
    },
    /// Print the fixed runtime ABI declarations
    Abi,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Demo {
            prefix,
            hex,
            signed,
        } => cmd_demo(&prefix, hex, signed),
        Command::Abi => cmd_abi(),
    }
}

/// A small module exercising every lowering path: scalar prints over
/// several operand types, a vector print, an assert, and a barrier.
fn demo_module(prefix: &str, hex: bool, signed: bool) -> (Module, LaunchCtx) {
    let print = |operand: Option<Value>| DebugOp::Print {
        prefix: prefix.to_string(),
        operand,
        hex,
        signed,
    };

    let mut module = Module::new("demo");
    module.funcs.push(Function::new(
        "kernel",
        vec![
            Instr::Debug(print(None)),
            Instr::Debug(print(Some(Value::new("x", Type::Int(8))))),
            Instr::Debug(print(Some(Value::new("y", Type::F16)))),
            Instr::Debug(DebugOp::Barrier),
            Instr::Debug(print(Some(Value::new(
                "acts",
                Type::Buf(Box::new(Type::F32)),
            )))),
            Instr::Debug(DebugOp::Assert {
                cond: Value::new("ok", Type::Int(1)),
                message: "lane out of range".into(),
                loc: Loc::in_func("kernel", Loc::file("demo.rpt", 4, 9)),
            }),
        ],
    ));

    let mut ctx = LaunchCtx::new();
    ctx.set_coordinate(
        "kernel",
        Coordinate([
            Value::new("pid0", Type::Int(32)),
            Value::new("pid1", Type::Int(32)),
            Value::new("pid2", Type::Int(32)),
        ]),
    );

    (module, ctx)
}

fn cmd_demo(prefix: &str, hex: bool, signed: bool) {
    let (mut module, ctx) = demo_module(prefix, hex, signed);
    let pristine = module.dump();

    if let Err(err) = LowerDebugPass::run(&mut module, &ctx) {
        pass_error_diagnostic(&err, &pristine).render("<module>", &pristine);
        process::exit(1);
    }

    print!("{}", module.dump());
}

fn cmd_abi() {
    let decls = [
        RuntimeDecl {
            name: runtime::SCALAR_PRINT.into(),
            sig: runtime::scalar_print_sig(),
        },
        RuntimeDecl {
            name: runtime::VECTOR_PRINT.into(),
            sig: runtime::vector_print_sig(),
        },
        RuntimeDecl {
            name: runtime::ASSERT.into(),
            sig: runtime::assert_sig(),
        },
    ];
    for decl in decls {
        println!("{}", decl);
    }
}
