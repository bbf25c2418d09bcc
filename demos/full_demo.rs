//! Complete workflow demonstration for voronoi_settlement

use voronoi_settlement::*;

fn main() -> Result<()> {
    println!("=== voronoi_settlement Complete Demo ===\n");

    // Step 1: Configure settlement
    println!("Step 1: Configuring settlement...");
    let config = SettlementConfigBuilder::new()
        .seed(12345)
        .tile_index(7)?
        .site_count(160)?
        .wall_radius(3)
        .relaxations(2)?
        .build()?;

    println!("  Seed: {}", config.seed);
    println!("  Tile: {}", config.tile_index);
    println!("  Bounds: {:?} .. {:?}", config.bounds.min, config.bounds.max);
    println!("  Sites: {}", config.site_count);

    // Step 2: Generate settlement
    println!("\nStep 2: Generating settlement...");
    let settlement = Settlement::generate(config)?;
    let graph = settlement.graph();
    println!(
        "  {} cells, {} vertices, {} edges",
        graph.cell_count(),
        graph.vertices().len(),
        graph.edges().len()
    );

    // Step 3: District structure
    println!("\nStep 3: Districts by rank:");
    let mut by_rank: Vec<usize> = Vec::new();
    for district in &settlement.layout().districts {
        if let Some(rank) = district.rank {
            let rank = rank as usize;
            if by_rank.len() <= rank {
                by_rank.resize(rank + 1, 0);
            }
            by_rank[rank] += 1;
        }
    }
    for (rank, count) in by_rank.iter().enumerate() {
        println!("  Rank {}: {} cells", rank, count);
    }

    println!("  Wall segments: {}", settlement.wall().len());
    println!("  Gateways: {}", settlement.gateways().len());
    println!("  Highway segments: {}", settlement.highways().len());
    println!("  Parcels: {}", settlement.parcel_count());

    // Step 4: Point lookup
    println!("\nStep 4: Spatial queries:");
    let middle = settlement.config().bounds.center();
    if let Some(cell) = settlement.cell_at(middle) {
        println!("  Position {:?} -> Cell {} (core is {})", middle, cell, settlement.core_cell());
    }

    // Step 5: Placement
    println!("\nStep 5: Placing molds...");
    let catalogue = MoldCatalogue::from_molds([
        Mold::new("hall", 10.0, 8.0, MoldKind::Building),
        Mold::new("house", 5.0, 4.0, MoldKind::Building),
        Mold::new("hut", 2.5, 2.5, MoldKind::Building),
        Mold::new("gatehouse", 8.0, 4.0, MoldKind::Gate),
        Mold::new("ramp", 6.0, 3.0, MoldKind::Ramp),
        Mold::new("curtain", 4.0, 1.5, MoldKind::Wall),
        Mold::new("tower", 3.0, 3.0, MoldKind::Tower),
    ])?;

    let mut layer = PlacementLayer::new();
    let terrain = |x: f32, z: f32| ((x * 0.02).sin() + (z * 0.03).cos()) * 2.0;
    layer.spawn(&settlement, &catalogue, &terrain);

    for mold in catalogue.iter() {
        let count = layer.placements().iter().filter(|p| p.mold == mold.id).count();
        println!("  {}: {}", mold.id, count);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
