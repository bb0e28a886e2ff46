use super::open_store;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use wastewise_core::types::Product;

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// Add a product to the eco-store catalogue
    Add {
        #[arg(long)]
        name: String,
        /// Price in eco points
        #[arg(long)]
        cost: i64,
        #[arg(long, default_value = "0")]
        stock: u32,
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List the catalogue, cheapest first
    List {
        /// Include products that are out of stock
        #[arg(long)]
        all: bool,
    },
}

pub fn run(root: &Path, subcmd: ProductSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProductSubcommand::Add {
            name,
            cost,
            stock,
            category,
            description,
        } => add(root, Product::new(name, description, cost, category, stock), json),
        ProductSubcommand::List { all } => list(root, all, json),
    }
}

fn add(root: &Path, product: Product, json: bool) -> anyhow::Result<()> {
    if product.name.trim().is_empty() {
        anyhow::bail!("product name must not be empty");
    }
    if product.points_cost <= 0 {
        anyhow::bail!("product cost must be a positive number of points");
    }
    let (_, store) = open_store(root)?;
    store.insert_product(&product)?;

    if json {
        return print_json(&product);
    }
    println!(
        "Added product '{}' ({} points, {} in stock)",
        product.name, product.points_cost, product.stock
    );
    Ok(())
}

fn list(root: &Path, all: bool, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let products = if all {
        store.list_products()?
    } else {
        store.list_products_in_stock()?
    };

    if json {
        return print_json(&products);
    }
    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }
    let rows = products
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.points_cost.to_string(),
                p.stock.to_string(),
                p.category.clone(),
            ]
        })
        .collect();
    print_table(&["NAME", "POINTS", "STOCK", "CATEGORY"], rows);
    Ok(())
}
