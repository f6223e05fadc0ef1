use photon_bootstrap::{Bootstrapper, HttpReplicaSetAdmin};
use photon_topology::{ClusterTopology, NodeSpec};
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for better logging
    tracing_subscriber::fmt::init();

    let topology = ClusterTopology::new(
        "rsUpload",
        vec![
            NodeSpec::new(0, "192.168.0.3", 27017),
            NodeSpec::new(1, "192.168.0.8", 27017),
            NodeSpec::new(2, "10.76.10.131", 27017),
            NodeSpec::new(3, "10.76.1.61", 27017),
            NodeSpec::new(4, "192.168.0.2", 27017),
        ],
    );

    let base_url = Url::parse("http://localhost:5000/api/")?;
    let admin = HttpReplicaSetAdmin::new(&base_url)?;
    let bootstrapper = Bootstrapper::new(admin);

    let report = bootstrapper.run(&topology).await?;
    println!("Bootstrap finished: {report:?}");

    Ok(())
}
