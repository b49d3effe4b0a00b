// respool demo binary - wires a trivial resource type into the pool.
// Richer walkthroughs live in the demos: cargo run --example basic

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use respool::{BoxError, Pool, PoolConfig, Resource};

struct DemoConn {
    id: usize,
}

impl Resource for DemoConn {
    fn close(&mut self) -> Result<(), BoxError> {
        println!("close conn {}", self.id);
        Ok(())
    }
}

fn main() {
    println!("=== respool demo ===");

    let pool = Pool::new(
        {
            let next = AtomicUsize::new(1);
            move || {
                let id = next.fetch_add(1, Ordering::Relaxed);
                println!("new conn {id}");
                Ok(DemoConn { id })
            }
        },
        PoolConfig::new().with_max_open(5).with_max_idle(2),
    );

    let mut workers = Vec::new();
    for worker in 0..3 {
        let pool = pool.clone();
        workers.push(thread::spawn(move || {
            for _ in 0..100 {
                match pool.get() {
                    Ok(conn) => {
                        // conn goes back to the pool when the guard drops
                        thread::sleep(Duration::from_millis(1));
                        drop(conn);
                    }
                    Err(err) => eprintln!("worker {worker}: {err}"),
                }
            }
        }));
    }

    for worker in workers {
        worker.join().expect("worker panicked");
    }

    println!("idle after workers: {}", pool.idle_count());
    pool.close().expect("close failed");
}
