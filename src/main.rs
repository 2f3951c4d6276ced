use rand::Rng;
use skiplist::{Config, SkipList};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = rand::thread_rng();
    let mut l = SkipList::<u32, u32>::with_config(Config::default().with_max_level(4))?;
    l.insert(50, 50);
    for _ in 0..20 {
        let k = rng.gen::<u32>() % 100;
        l.insert(k, k);
    }
    println!("{:?}", l);
    println!("{:?}", l.get(&50));
    l.remove(&50);
    println!("{:?}", l.get(&50));
    *l.get_or_insert_default(200) += 1;
    println!("{:?}", l);
    println!("len {} level {}", l.len(), l.level());
    Ok(())
}
