use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::debug;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rusty_slots::hash_table::HashTable;
use rusty_slots::logger::initialize_logger;
use rusty_slots::render::{legend, render_grid, DEFAULT_COLUMNS};
use rusty_slots::session::{Command, Operation, Session};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "rusty_slots",
    about = "Fixed capacity hash table with linear probing and tombstones",
    version
)]
struct Cli {
    /// Number of slots in the table.
    #[arg(long, default_value_t = HashTable::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Cells per row when drawing the table.
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Walk through a fixed sequence of inserts, searches and deletes.
    Demo,
    /// Read insert/search/delete/show/quit commands from stdin.
    Repl,
    /// Time inserts, searches and deletes of random keys.
    Bench {
        #[arg(long, default_value_t = 1000)]
        samples: usize,
        #[arg(long, default_value_t = 8)]
        key_len: usize,
    },
}

fn main() -> Result<()> {
    initialize_logger();
    let cli = Cli::parse();
    debug!("capacity {}, columns {}", cli.capacity, cli.columns);

    match cli.command {
        Mode::Demo => demo(cli.capacity, cli.columns),
        Mode::Repl => repl(cli.capacity, cli.columns),
        Mode::Bench { samples, key_len } => bench(cli.capacity, samples, key_len),
    }
}

fn show(session: &Session, columns: usize) {
    let table: &HashTable = session.table();
    print!("{}", render_grid(table, columns, session.highlight()));
    println!(
        "{} of {} slots used, {} tombstones",
        table.count(),
        table.capacity(),
        table.tombstones()
    );
}

fn demo(capacity: usize, columns: usize) -> Result<()> {
    let mut session = Session::new(capacity);
    let steps: Vec<Operation> = vec![
        Operation::Insert("Espada".to_owned()),
        Operation::Search("Espada".to_owned()),
        Operation::Insert("Escudo".to_owned()),
        Operation::Insert("Arco".to_owned()),
        Operation::Insert("Poção".to_owned()),
        Operation::Insert("Chave".to_owned()),
        Operation::Delete("Espada".to_owned()),
        Operation::Search("Escudo".to_owned()),
        Operation::Insert("Machado".to_owned()),
    ];

    println!("{}", legend());
    for step in steps {
        println!();
        println!(">>> {:?}", step);
        println!("{}", session.execute(step));
        show(&session, columns);
    }
    Ok(())
}

fn repl(capacity: usize, columns: usize) -> Result<()> {
    let mut session = Session::new(capacity);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", legend());
    show(&session, columns);
    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        match Command::parse(&line?) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Show)) => show(&session, columns),
            Ok(Some(Command::Run(operation))) => {
                println!("status: {}", session.execute(operation));
                show(&session, columns);
            }
            Ok(None) => (),
            Err(err) => println!("status: {}", err),
        }
        print!("> ");
        stdout.flush()?;
    }
    println!();
    Ok(())
}

fn random_keys(samples: usize, key_len: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..samples)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(key_len)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn bench(capacity: usize, samples: usize, key_len: usize) -> Result<()> {
    let keys: Vec<String> = random_keys(samples, key_len);
    let mut table: HashTable = HashTable::with_capacity(capacity);

    let now: Instant = Instant::now();
    let mut inserted: usize = 0;
    for key in keys.iter() {
        if let Err(err) = table.insert(key) {
            println!("Stopped inserting after {} keys: {}", inserted, err);
            break;
        }
        inserted += 1;
    }
    let elapsed: f64 = now.elapsed().as_nanos() as f64;

    println!("Capacity {} keys {} stored {}", table.capacity(), samples, table.count());
    println!("Load factor {}", table.load_factor());
    println!("Avg time to insert {}", elapsed / inserted.max(1) as f64);

    let now: Instant = Instant::now();
    for key in keys.iter().take(inserted) {
        if table.search(key).is_none() {
            return Err(anyhow!("failed to find key {}", key));
        }
    }
    let elapsed: f64 = now.elapsed().as_nanos() as f64;
    println!("Avg time to search {}", elapsed / inserted.max(1) as f64);

    benchmarking::warm_up();
    let bench_result = benchmarking::measure_function(|measurer| {
        for key in keys.iter().take(inserted) {
            measurer.measure(|| table.search(key));
        }
    })
    .map_err(|err| anyhow!("search benchmark failed: {:?}", err))?;
    println!("Measured search time {:?}", bench_result.elapsed());

    let now: Instant = Instant::now();
    for key in keys.iter().take(inserted) {
        table.delete(key);
    }
    let elapsed: f64 = now.elapsed().as_nanos() as f64;
    println!("Avg time to delete {}", elapsed / inserted.max(1) as f64);
    println!(
        "Stored {} tombstones {}",
        table.count(),
        table.tombstones()
    );

    Ok(())
}
