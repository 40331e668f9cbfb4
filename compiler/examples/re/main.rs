use std::io::{self, BufRead};

use rangex_compiler::Regex;

const USAGE: &str = "re [-d|--debug] [-m|--match] PATTERN";

fn main() -> Result<(), String> {
    let (debug, whole_line, args) = std::env::args().skip(1).fold(
        (false, false, vec![]),
        |(debug, whole_line, mut args), arg| match arg.as_str() {
            "--debug" | "-d" => (true, whole_line, args),
            "--match" | "-m" => (debug, true, args),
            _ => {
                args.push(arg);
                (debug, whole_line, args)
            }
        },
    );

    let pattern = match args.len() {
        1 => args.first().cloned().ok_or_else(|| USAGE.to_string()),
        _ => Err(USAGE.to_string()),
    }?;

    let re = Regex::new(&pattern).map_err(|e| e.to_string())?;

    if debug {
        println!(
            "DEBUG
--------
{}--------
",
            re.automaton()
        )
    }

    if re.is_empty() {
        return Err(format!("pattern `{}` accepts nothing", pattern));
    }

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) => {
                let found = if whole_line {
                    re.matches(&line)
                } else {
                    re.search(&line)
                };
                if found.is_some() {
                    println!("{}", line);
                }
            }
            Err(e) => return Err(format!("{}", e)),
        }
    }

    Ok(())
}
