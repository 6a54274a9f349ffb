//! Accept transfers forever and save them into a directory.
//!
//! Usage: cargo run --example receive-files -- [DIR] [BIND]

use stuffsend::transfer::Receiver;

fn main() {
    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "received".to_string());
    let bind = args.next().unwrap_or_else(|| "127.0.0.1:5000".to_string());

    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create {dir}: {err}");
        std::process::exit(73);
    }

    let receiver = match Receiver::bind(bind.as_str()) {
        Ok(receiver) => receiver,
        Err(err) => {
            eprintln!("bind failed: {err}");
            std::process::exit(3);
        }
    };
    println!("receiving on {} into {dir}", receiver.local_addr());

    loop {
        let file = match receiver.accept_file() {
            Ok(file) => file,
            Err(err) => {
                eprintln!("transfer dropped: {err}");
                continue;
            }
        };
        match file.save_into(&dir) {
            Ok(path) => println!(
                "{} ({} bytes, {} stuffed) -> {}",
                file.file_name,
                file.payload.len(),
                file.stuffed_size,
                path.display()
            ),
            Err(err) => eprintln!("not saved: {err}"),
        }
    }
}
