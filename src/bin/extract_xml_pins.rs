use std::env;
use std::error::Error;
use std::path::Path;
use std::process;

use mcx_pin_extract::emit::gpio_blocks;
use mcx_pin_extract::pins::PinTable;
use mcx_pin_extract::xml::load_pinout;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        process::exit(1);
    }
    let records = load_pinout(Path::new(&args[1]))?;
    let mut table = PinTable::new();
    for rec in records {
        table.insert(rec);
    }
    print!("{}", gpio_blocks(&table.ports()));
    Ok(())
}
