use dicelang::DiceRoller;
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut roller = DiceRoller::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        if !line.trim().is_empty() {
            println!("{}", roller.evaluate(&line));
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
