use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args_os().skip(1);
    match (args.next(), args.next(), args.next()) {
        (Some(input), Some(output), None) => {
            waylite_scanner::generate_to_file(input, output);
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("usage: waylite-scanner <protocol.xml> <out.rs>");
            ExitCode::FAILURE
        }
    }
}
