//! Coaching context and prompt construction.
//!
//! The network call lives in the server; this module only decides what the
//! coach is told and what the offline coach says back.

use crate::types::{DailyLogRecord, User};
use serde::{Deserialize, Serialize};

pub const RECOMMENDATION_CATEGORY: &str = "coach";
pub const GREETING: &str = "Hello! I'm your WasteWise AI Coach. I'm here to help you reduce waste and build sustainable habits. How can I assist you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A prior message in the conversation, as sent by the chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// What the coach knows about the household.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachContext {
    pub avg_daily_waste_kg: f64,
    pub household_size: u32,
    pub log_count: usize,
    pub avg_plastic_kg: f64,
}

impl CoachContext {
    pub fn from_logs(logs: &[DailyLogRecord], user: Option<&User>) -> Self {
        let count = logs.len();
        let divisor = count.max(1) as f64;
        let total: f64 = logs.iter().map(|l| l.total_kg).sum();
        let plastic: f64 = logs.iter().map(|l| l.plastic_kg).sum();
        Self {
            avg_daily_waste_kg: total / divisor,
            household_size: user.map(|u| u.household_size).unwrap_or(1),
            log_count: count,
            avg_plastic_kg: plastic / divisor,
        }
    }
}

pub fn system_prompt(ctx: &CoachContext) -> String {
    format!(
        "You are an expert waste management coach helping Indian households reduce waste sustainably. \n\
Your role is to provide personalized, actionable advice based on the user's waste patterns.\n\
\n\
User Context:\n\
- Daily waste average: {avg:.1} kg\n\
- Household size: {size} people\n\
- Recent logs: {count} entries\n\
\n\
Guidelines:\n\
1. Be encouraging and celebrate small wins\n\
2. Provide specific, actionable recommendations\n\
3. Reference Indian context and local solutions\n\
4. Focus on waste reduction, composting, and sustainable practices\n\
5. Use relatable examples and analogies\n\
6. Ask clarifying questions to understand their situation better\n\
7. Suggest habits that can compound over time\n\
\n\
Respond helpfully and conversationally.",
        avg = ctx.avg_daily_waste_kg,
        size = ctx.household_size,
        count = ctx.log_count,
    )
}

fn is_greeting(lower: &str) -> bool {
    let word = lower.trim().trim_end_matches(['!', '.', '?']);
    matches!(word, "hi" | "hello" | "hey" | "namaste")
}

/// Deterministic reply used when no generative backend is configured.
///
/// A bare greeting that opens a conversation gets the coach's introduction.
pub fn canned_reply(ctx: &CoachContext, history: &[ChatTurn], message: &str) -> String {
    let lower = message.to_lowercase();
    if history.is_empty() && is_greeting(&lower) {
        return GREETING.to_string();
    }
    let mut reply = String::new();

    if ctx.log_count == 0 {
        reply.push_str(
            "I don't see any waste logs yet. Log a few days of kitchen, plastic, paper and garden waste so I can tailor my advice. ",
        );
    } else {
        let per_person = ctx.avg_daily_waste_kg / ctx.household_size.max(1) as f64;
        reply.push_str(&format!(
            "Your household of {} averages {:.1} kg of waste a day ({:.1} kg per person) over your last {} logs. ",
            ctx.household_size, ctx.avg_daily_waste_kg, per_person, ctx.log_count
        ));
    }

    let tip = if lower.contains("plastic") || lower.contains("bag") {
        "Carry a cloth bag and steel containers for market trips, and buy staples like dal and rice loose from the kirana store to cut packaging."
    } else if lower.contains("compost") || lower.contains("kitchen") || lower.contains("food") {
        "Start a two-bin compost: one for fresh vegetable peels and tea leaves, one resting. Mix in dry leaves or shredded newspaper to keep it from smelling."
    } else if lower.contains("paper") {
        "Flatten cartons and newspapers and hand them to your local raddiwala; paper is one of the easiest streams to recycle for cash."
    } else if ctx.avg_plastic_kg > 0.0 && ctx.avg_plastic_kg > 0.3 * ctx.avg_daily_waste_kg {
        "Plastic is a big share of your waste right now. Swapping packaged snacks and single-use bags for refillable options is the quickest win."
    } else {
        "Separate wet and dry waste at the source. Wet waste can feed a biogas digester or compost bin, and clean dry waste goes to recycling."
    };
    reply.push_str(tip);
    reply.push_str(" What would you like to work on this week?");
    reply
}
