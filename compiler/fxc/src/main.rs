//! fxc command line

use fxc::commands::{compile_file, dump_artifact};

fn main() {
    fxc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "compile" => compile_file(&args[2..]),
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: fxc dump <artifact.fxb>");
                std::process::exit(1);
            }
            dump_artifact(&args[2]);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("fxc {}", env!("CARGO_PKG_VERSION"));
        }
        command => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("fxc - offline effect compiler");
    println!();
    println!("Usage: fxc <command> [options]");
    println!();
    println!("Commands:");
    println!("  compile <effect.json>  Link every program of an effect");
    println!("  dump <artifact.fxb>    Print a compiled program");
    println!("  help                   Show this help message");
    println!("  version                Show version information");
    println!();
    println!("Compile options:");
    println!("  -o <dir>               Output directory (default: .)");
    println!("  --target <profile>     spv10 (default), glsl450, glsl330, hlsl5, c");
    println!("  /NOSUB                 Resolve subroutines statically");
    println!("  /OUTPUT                Write generated stage sources next to the artifacts");
    println!("  /O                     Optimize");
    println!("  --no-interface-check   Skip cross-stage interface validation");
    println!("  --parallel             Link programs on a thread pool");
    println!();
    println!("Examples:");
    println!("  fxc compile sky.json -o build");
    println!("  fxc compile sky.json -o build --target glsl450 /NOSUB");
    println!("  fxc dump build/Sky.fxb");
    println!();
    println!("Set RUST_LOG=debug for a trace of every phase.");
}
