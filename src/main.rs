use mailalert::run_alert;
use std::env;
use std::io::stderr;

fn main() {
    let args: Vec<String> = env::args().collect();

    let exit_code = run_alert(&mut stderr(), &args);

    std::process::exit(exit_code);
}
