//! Dropping a pool while resources are on loan

use esox_resourcepool::{Pool, PooledObject};

struct Connection(u32);

impl Drop for Connection {
    fn drop(&mut self) {
        println!("   Connection {} closed", self.0);
    }
}

fn main() {
    println!("=== EsoxSolutions.ResourcePool - Teardown ===\n");
    
    let pool: Pool<Connection> = Pool::new();
    for id in 0..3 {
        pool.add(Box::new(Connection(id)));
    }
    
    let held = pool.acquire().unwrap();
    println!("Holding connection {}", held.0);
    
    println!("Dropping the pool:");
    drop(pool);
    println!("   Pool alive: {}", PooledObject::is_pool_alive(&held));
    
    println!("Releasing the held connection:");
    drop(held);
}
