//! Async usage examples for respool

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use respool::{BoxError, Pool, PoolConfig, Resource};

struct Session {
    id: usize,
}

impl Resource for Session {
    fn close(&mut self) -> Result<(), BoxError> {
        println!("   [session {} closed]", self.id);
        Ok(())
    }
}

fn session_pool(config: PoolConfig<Session>) -> Pool<Session> {
    let next = Arc::new(AtomicUsize::new(1));
    Pool::new(
        move || Ok(Session { id: next.fetch_add(1, Ordering::Relaxed) }),
        config,
    )
}

#[tokio::main]
async fn main() {
    println!("=== respool - Async Examples ===\n");

    // Example 1: Async get
    async_get().await;

    // Example 2: Async acquisition timeout
    async_timeout().await;

    // Example 3: Concurrent tasks sharing a small pool
    concurrent_tasks().await;
}

async fn async_get() {
    println!("1. Async Get:");
    let pool = session_pool(PoolConfig::default());

    {
        let session = pool.get_async().await.unwrap();
        println!("   Got session {} asynchronously", session.id);
    }

    println!();
}

async fn async_timeout() {
    println!("2. Async Timeout:");
    let pool = session_pool(
        PoolConfig::new()
            .with_max_open(1)
            .with_acquire_timeout(Duration::from_millis(100)),
    );

    // pin the only session
    let _held = pool.get().unwrap();

    match pool.get_async().await {
        Ok(session) => println!("   Got session {}", session.id),
        Err(err) => println!("   Error: {err}"),
    }

    println!();
}

async fn concurrent_tasks() {
    println!("3. Concurrent Tasks:");
    let pool = session_pool(PoolConfig::new().with_max_open(2).with_max_idle(2));

    let mut handles = vec![];
    for task in 0..6 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let session = pool.get_async().await.unwrap();
            println!("   Task {task} using session {}", session.id);
            tokio::time::sleep(Duration::from_millis(20)).await;
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    println!("   Final idle: {}", pool.idle_count());
    pool.close().unwrap();
}
