//! Basic usage examples for respool

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use respool::{BoxError, Pool, PoolConfig, Resource};

struct Conn {
    id: usize,
    healthy: bool,
}

impl Resource for Conn {
    fn close(&mut self) -> Result<(), BoxError> {
        println!("   [conn {} closed]", self.id);
        Ok(())
    }
}

fn conn_pool(config: PoolConfig<Conn>) -> Pool<Conn> {
    let next = Arc::new(AtomicUsize::new(1));
    Pool::new(
        move || {
            let id = next.fetch_add(1, Ordering::Relaxed);
            println!("   [conn {id} created]");
            Ok(Conn { id, healthy: true })
        },
        config,
    )
}

fn main() {
    tracing_subscriber::fmt().init();

    println!("=== respool - Basic Examples ===\n");

    // Example 1: RAII guards
    guarded_usage();

    // Example 2: Explicit put/release protocol
    explicit_protocol();

    // Example 3: Capacity limits
    capacity_limits();

    // Example 4: Idle timeout and health checks
    eviction();

    // Example 5: Status and shutdown
    status_and_shutdown();
}

fn guarded_usage() {
    println!("1. RAII Guards:");
    let pool = conn_pool(PoolConfig::default());

    {
        let conn = pool.get().unwrap();
        println!("   Got conn {}", conn.id);
        // returned to the pool when the guard drops
    }

    println!("   Idle after return: {}\n", pool.idle_count());
}

fn explicit_protocol() {
    println!("2. Explicit Protocol:");
    let pool = conn_pool(PoolConfig::default());

    let conn = pool.get().unwrap().detach();
    println!("   Checked out conn {}", conn.id);
    pool.put(conn);
    println!("   Returned for reuse, idle: {}", pool.idle_count());

    let conn = pool.get().unwrap().detach();
    pool.release(conn);
    println!("   Released for disposal, open: {}\n", pool.open_count());
}

fn capacity_limits() {
    println!("3. Capacity Limits:");
    let pool = conn_pool(PoolConfig::new().with_max_open(1).with_max_idle(1));

    let held = pool.get().unwrap();
    match pool.try_get().unwrap() {
        Some(_) => println!("   Unexpected second conn"),
        None => println!("   Pool at capacity, try_get returned none"),
    }

    drop(held);
    println!("   After return, idle: {}\n", pool.idle_count());
}

fn eviction() {
    println!("4. Eviction:");
    let config = PoolConfig::new()
        .with_idle_timeout(Duration::from_millis(50))
        .with_test_on_borrow(|conn: &Conn, _returned_at: Instant| {
            if conn.healthy {
                Ok(())
            } else {
                Err("connection went bad".into())
            }
        });
    let pool = conn_pool(config);

    let mut conn = pool.get().unwrap().detach();
    conn.healthy = false;
    pool.put(conn);

    // the unhealthy conn is discarded and a fresh one dialed
    let fresh = pool.get().unwrap();
    println!("   Borrow check replaced bad conn with conn {}\n", fresh.id);
}

fn status_and_shutdown() {
    println!("5. Status and Shutdown:");
    let pool = conn_pool(PoolConfig::new().with_max_open(4));

    let first = pool.get().unwrap();
    let second = pool.get().unwrap();
    drop(second);

    let status = pool.status();
    println!(
        "   open {} / {:?}, idle {} / {}",
        status.open, status.max_open, status.idle, status.max_idle
    );

    drop(first);
    pool.close().unwrap();
    println!("   Closed; further gets fail: {}", pool.get().is_err());
}
