use crate::output::{kg, print_json, print_table};
use wastewise_core::calc::{weekly_breakdown, ConversionResult};
use wastewise_core::validate::WasteInput;

pub struct CalcArgs {
    pub kitchen: f64,
    pub plastic: f64,
    pub paper: f64,
    pub garden: f64,
    pub weekly: bool,
}

pub fn run(args: CalcArgs, json: bool) -> anyhow::Result<()> {
    let input = WasteInput {
        kitchen_kg: args.kitchen,
        plastic_kg: args.plastic,
        paper_kg: args.paper,
        garden_kg: args.garden,
    };
    let results = input.validate()?.convert();
    let weekly = args.weekly.then(|| weekly_breakdown(&results));

    if json {
        let mut value = serde_json::json!({ "results": results });
        if let Some(weeks) = &weekly {
            value["weekly"] = serde_json::to_value(weeks)?;
        }
        return print_json(&value);
    }

    print_results(&results);
    if let Some(weeks) = weekly {
        println!();
        let rows = weeks
            .iter()
            .map(|w| {
                vec![
                    w.week.clone(),
                    format!("{:.2}", w.biogas),
                    format!("{:.3}", w.electricity),
                    format!("{:.2}", w.savings),
                ]
            })
            .collect();
        print_table(&["WEEK", "BIOGAS (L)", "ELECTRICITY (kWh)", "SAVINGS (₹)"], rows);
    }
    Ok(())
}

fn print_results(r: &ConversionResult) {
    let p = &r.monthly_projection;
    let rows = vec![
        vec!["Biogas".into(), kg(r.biogas_liters), "L/day".into()],
        vec!["Electricity".into(), kg(r.electricity_kwh), "kWh/month".into()],
        vec!["Savings".into(), r.cost_savings_inr.to_string(), "₹/month".into()],
        vec!["CO₂ reduction".into(), kg(r.co2_reduction_kg), "kg/year".into()],
        vec!["Fertilizer".into(), kg(r.fertilizer_kg), "kg/month".into()],
        vec!["Monthly biogas".into(), kg(p.biogas), "L".into()],
        vec!["Monthly CO₂".into(), kg(p.co2), "kg".into()],
    ];
    print_table(&["METRIC", "VALUE", "UNIT"], rows);
}
