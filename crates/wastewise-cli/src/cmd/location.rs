use super::open_store;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use uuid::Uuid;
use wastewise_core::geo::{within_radius, Coordinates, DEFAULT_RADIUS_KM};
use wastewise_core::types::{CommunityLocation, LocationKind};
use wastewise_core::validate::LocationInput;

#[derive(Subcommand)]
pub enum LocationSubcommand {
    /// Register a community location
    Add {
        #[arg(long)]
        name: String,
        /// Location type: digester, compost, or pickup
        #[arg(long = "type", value_name = "TYPE")]
        kind: LocationKind,
        #[arg(long)]
        address: String,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },
    /// List community locations, optionally near a point
    List {
        /// Only show this type: digester, compost, or pickup
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<LocationKind>,
        #[arg(long, allow_hyphen_values = true, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "latitude")]
        longitude: Option<f64>,
        /// Search radius in km (with --latitude/--longitude)
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius: f64,
    },
}

pub fn run(root: &Path, subcmd: LocationSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        LocationSubcommand::Add {
            name,
            kind,
            address,
            contact,
            latitude,
            longitude,
        } => add(
            root,
            LocationInput {
                name,
                kind,
                address,
                contact,
                latitude,
                longitude,
            },
            json,
        ),
        LocationSubcommand::List {
            kind,
            latitude,
            longitude,
            radius,
        } => {
            let origin = latitude.zip(longitude).map(|(lat, lng)| Coordinates::new(lat, lng));
            list(root, kind, origin, radius, json)
        }
    }
}

fn add(root: &Path, input: LocationInput, json: bool) -> anyhow::Result<()> {
    input.validate()?;
    let (_, store) = open_store(root)?;
    let location = CommunityLocation {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        kind: input.kind,
        address: input.address.trim().to_string(),
        contact: input.contact,
        latitude: input.latitude,
        longitude: input.longitude,
    };
    store.insert_location(&location)?;

    if json {
        return print_json(&location);
    }
    println!("Added {} location '{}'", location.kind, location.name);
    Ok(())
}

fn list(
    root: &Path,
    kind: Option<LocationKind>,
    origin: Option<Coordinates>,
    radius: f64,
    json: bool,
) -> anyhow::Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        anyhow::bail!("radius must be a non-negative number of km");
    }
    let (_, store) = open_store(root)?;
    let locations = store.list_locations(kind)?;

    let Some(origin) = origin else {
        if json {
            return print_json(&locations);
        }
        let rows = locations
            .iter()
            .map(|l| vec![l.name.clone(), l.kind.to_string(), l.address.clone()])
            .collect();
        print_table(&["NAME", "TYPE", "ADDRESS"], rows);
        return Ok(());
    };

    let nearby = within_radius(locations, origin, radius);
    if json {
        return print_json(&nearby);
    }
    if nearby.is_empty() {
        println!("No locations within {radius} km.");
        return Ok(());
    }
    let rows = nearby
        .iter()
        .map(|n| {
            vec![
                n.item.name.clone(),
                n.item.kind.to_string(),
                format!("{:.2}", n.distance_km),
            ]
        })
        .collect();
    print_table(&["NAME", "TYPE", "DISTANCE (km)"], rows);
    Ok(())
}
