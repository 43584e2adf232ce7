//! Async usage examples

use esox_resourcepool::{Milliseconds, Pool, Seconds};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() {
    println!("=== EsoxSolutions.ResourcePool - Async Examples ===\n");
    
    // Example 1: Async acquire
    async_acquire().await;
    
    // Example 2: Async with timeout
    async_with_timeout().await;
    
    // Example 3: Concurrent access
    concurrent_access().await;
}

async fn async_acquire() {
    println!("1. Async Acquire:");
    let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3]);
    
    {
        let obj = pool.acquire_async().await.unwrap();
        println!("   Got resource asynchronously: {}", *obj);
    }
    
    println!();
}

async fn async_with_timeout() {
    println!("2. Async with Timeout:");
    let pool: Pool<i32, Milliseconds, 100> = Pool::from_resources(vec![42]);
    
    // Take the only resource
    let _obj = pool.acquire().unwrap();
    
    // Try to get another (should time out)
    match pool.get_async().await {
        Ok(_) => println!("   Got resource"),
        Err(e) => println!("   Error: {}", e),
    }
    
    println!();
}

async fn concurrent_access() {
    println!("3. Concurrent Access:");
    let pool: Pool<i32, Seconds, 5> = Pool::from_resources(1..=3);
    
    let mut handles = vec![];
    for i in 0..6 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let obj = pool.acquire_async().await.unwrap();
            println!("   Task {} got resource {}", i, *obj);
            sleep(Duration::from_millis(10)).await;
        }));
    }
    
    for handle in handles {
        handle.await.unwrap();
    }
    
    println!("   Idle after all tasks: {}", pool.idle_count());
}
