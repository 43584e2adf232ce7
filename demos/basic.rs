//! Basic usage examples for Pool

use esox_resourcepool::Pool;

fn main() {
    println!("=== EsoxSolutions.ResourcePool - Basic Examples ===\n");
    
    // Example 1: Simple pool of buffers
    simple_pool();
    
    // Example 2: LIFO reuse
    lifo_reuse();
    
    // Example 3: Try and get
    try_methods();
    
    // Example 4: Metrics
    metrics();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool: Pool<Vec<u8>> = Pool::new();
    pool.add(Box::new(Vec::with_capacity(1024)));
    
    {
        let mut buf = pool.acquire().unwrap();
        buf.extend_from_slice(b"payload");
        println!("   Got buffer holding {} bytes", buf.len());
        // Buffer automatically returned when dropped
    }
    
    println!("   Idle after return: {}\n", pool.idle_count());
}

fn lifo_reuse() {
    println!("2. LIFO Reuse:");
    let pool: Pool<&'static str> = Pool::from_resources(["cold", "warm"]);
    
    let first = pool.acquire().unwrap();
    println!("   First acquire: {}", *first);
    drop(first);
    
    let again = pool.acquire().unwrap();
    println!("   Acquire after return: {}\n", *again);
}

fn try_methods() {
    println!("3. Acquire and Get:");
    let pool: Pool<i32> = Pool::from_resources(vec![42]);
    
    let obj1 = pool.acquire();
    assert!(obj1.is_some());
    println!("   First acquire: Success");
    
    let obj2 = pool.acquire();
    assert!(obj2.is_none());
    println!("   Second acquire: None (pool empty)");
    
    if let Err(e) = pool.get() {
        println!("   Get: {}", e);
    }
    
    drop(obj1);
    
    let obj3 = pool.acquire();
    assert!(obj3.is_some());
    println!("   Third acquire: Success\n");
}

fn metrics() {
    println!("4. Metrics:");
    let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3, 4, 5]);
    
    {
        let _obj1 = pool.acquire().unwrap();
        let _obj2 = pool.acquire().unwrap();
        println!("   Idle while two are on loan: {}", pool.idle_count());
    }
    
    let metrics = pool.metrics().export();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
