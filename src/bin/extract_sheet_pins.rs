use std::env;
use std::error::Error;
use std::path::Path;
use std::process;

use mcx_pin_extract::emit::{gpio_blocks, lpuart_block};
use mcx_pin_extract::pins::PinTable;
use mcx_pin_extract::sheet::load_sheet;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        process::exit(1);
    }
    let records = load_sheet(Path::new(&args[1]))?;
    let mut table = PinTable::new();
    for rec in records {
        table.insert(rec);
    }
    print!("{}", gpio_blocks(&table.ports()));
    println!();
    println!();
    print!("{}", lpuart_block());
    Ok(())
}
