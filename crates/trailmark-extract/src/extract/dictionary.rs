//! Static pattern dictionary: regex → entity type, confidence, category.
//!
//! Every pattern is lower-case and is run against lower-cased post text.

use once_cell::sync::Lazy;
use regex::Regex;

use trailmark_core::EntityType;

/// One compiled dictionary row.
pub struct PatternEntry {
    pub regex: Regex,
    pub entity_type: EntityType,
    pub confidence: f64,
    pub category: &'static str,
}

/// `(names, category)` rows; every name in a row shares the same category.
type Rows = &'static [(&'static [&'static str], &'static str)];

const PLACES: Rows = &[
    (&["bangkok", "chiang mai", "chiang rai", "pattaya", "ayutthaya", "sukhothai", "pai", "kanchanaburi", "hua hin"], "thailand-city"),
    (&["phuket", "krabi", "koh samui", "koh phangan", "koh tao", "koh lanta", "koh phi phi", "phi phi islands", "railay"], "thailand-island"),
    (&["hanoi", "ho chi minh city", "saigon", "hoi an", "da nang", "ha long bay", "sapa"], "vietnam"),
    (&["siem reap", "phnom penh", "luang prabang", "vientiane", "vang vieng"], "indochina"),
    (&["bali", "ubud", "lombok", "jakarta", "yogyakarta", "gili islands"], "indonesia"),
    (&["singapore", "kuala lumpur", "penang", "langkawi", "malacca"], "malaysia-singapore"),
    (&["tokyo", "kyoto", "osaka", "nara", "hiroshima", "hokkaido"], "japan"),
    (&["seoul", "busan", "jeju", "taipei", "hong kong", "macau", "manila", "palawan", "cebu", "el nido"], "east-asia"),
    (&["paris", "london", "rome", "barcelona", "lisbon", "amsterdam", "berlin", "prague", "vienna", "istanbul"], "europe-city"),
    (&["new york", "san francisco", "sydney", "melbourne", "dubai", "kathmandu"], "world-city"),
    (&["thailand", "vietnam", "cambodia", "laos", "myanmar", "malaysia", "indonesia", "japan", "philippines", "south korea", "taiwan", "nepal", "sri lanka"], "country"),
    (&["khao san road", "chatuchak", "sukhumvit", "silom", "old city", "night bazaar", "floating market"], "neighbourhood"),
];

const FOODS: Rows = &[
    (&["pad thai", "tom yum", "tom kha", "som tam", "khao soi", "massaman curry", "green curry", "pad krapow", "khao man gai", "larb", "moo ping", "boat noodles"], "thai-dish"),
    (&["mango sticky rice", "roti", "coconut ice cream", "khanom krok"], "dessert"),
    (&["pho", "banh mi", "bun cha", "cao lau", "banh xeo", "fresh spring rolls"], "vietnamese-dish"),
    (&["nasi goreng", "mie goreng", "satay", "rendang", "laksa", "nasi lemak", "char kway teow", "hainanese chicken rice"], "malay-indonesian-dish"),
    (&["ramen", "sushi", "sashimi", "tempura", "okonomiyaki", "takoyaki", "dim sum", "bibimbap", "kimchi", "xiao long bao"], "east-asian-dish"),
    (&["thai iced tea", "cha yen", "singha", "chang beer", "egg coffee", "bubble tea"], "drink"),
    (&["street food", "night market food", "seafood"], "food-style"),
];

const ACTIVITIES: Rows = &[
    (&["hiking", "trekking", "rock climbing", "zip lining", "ziplining", "waterfall hike", "jungle trek"], "outdoor"),
    (&["snorkeling", "snorkelling", "scuba diving", "diving", "island hopping", "kayaking", "surfing", "paddleboarding"], "water"),
    (&["cooking class", "food tour", "street food tour", "market tour"], "culinary"),
    (&["temple hopping", "temple visit", "sightseeing", "walking tour", "photography"], "sightseeing"),
    (&["thai massage", "yoga retreat", "meditation retreat", "spa day"], "wellness"),
    (&["elephant sanctuary", "night safari", "bird watching"], "wildlife"),
];

const TRANSPORT: Rows = &[
    (&["tuk tuk", "tuk-tuk", "songthaew", "motorbike taxi", "grab", "bolt"], "local"),
    (&["bts skytrain", "skytrain", "mrt", "airport rail link", "metro"], "rail-urban"),
    (&["night train", "sleeper train", "bullet train", "shinkansen"], "rail"),
    (&["longtail boat", "long-tail boat", "speedboat", "ferry"], "boat"),
    (&["overnight bus", "minivan", "scooter rental"], "road"),
];

const ORGANIZATIONS: Rows = &[
    (&["airasia", "thai airways", "bangkok airways", "vietjet", "singapore airlines", "cathay pacific"], "airline"),
    (&["unesco", "tourism authority of thailand", "national park service"], "institution"),
    (&["airbnb", "booking.com", "agoda", "hostelworld", "12go", "klook"], "travel-platform"),
    (&["7-eleven", "family mart", "starbucks"], "retail"),
];

const EVENTS: Rows = &[
    (&["songkran", "loy krathong", "yi peng", "full moon party", "vegetarian festival"], "thai-festival"),
    (&["tet", "chinese new year", "lunar new year", "cherry blossom season", "hanami", "nyepi"], "asian-festival"),
    (&["monsoon season", "rainy season", "high season"], "season"),
];

const CULTURAL: Rows = &[
    (&["wat pho", "wat arun", "wat phra kaew", "grand palace", "wat rong khun", "doi suthep", "angkor wat", "borobudur", "fushimi inari"], "landmark"),
    (&["buddhist temple", "temple", "pagoda", "shrine", "monastery", "stupa"], "religious-site"),
    (&["muay thai", "buddhism", "monks", "alms giving", "wai", "tea ceremony"], "tradition"),
    (&["national museum", "museum", "art gallery", "old town"], "heritage"),
];

const THINGS: Rows = &[
    (&["sim card", "esim", "travel insurance", "visa on arrival", "e-visa", "power bank", "rail pass"], "essentials"),
    (&["hostel", "guesthouse", "boutique hotel", "homestay", "resort"], "accommodation"),
];

fn compile(rows: Rows, entity_type: EntityType, confidence: f64, out: &mut Vec<PatternEntry>) {
    for (names, category) in rows {
        let alternation = names
            .iter()
            .map(|n| regex::escape(n).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"\b(?:{})\b", alternation);
        match Regex::new(&pattern) {
            Ok(regex) => out.push(PatternEntry {
                regex,
                entity_type,
                confidence,
                category,
            }),
            Err(e) => tracing::error!("Invalid dictionary pattern {}: {}", pattern, e),
        }
    }
}

/// The full dictionary, compiled once.
pub static DICTIONARY: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    let mut entries = Vec::new();
    compile(PLACES, EntityType::Place, 0.95, &mut entries);
    compile(FOODS, EntityType::Food, 0.9, &mut entries);
    compile(ACTIVITIES, EntityType::Activity, 0.85, &mut entries);
    compile(TRANSPORT, EntityType::Transport, 0.85, &mut entries);
    compile(ORGANIZATIONS, EntityType::Organization, 0.8, &mut entries);
    compile(EVENTS, EntityType::Event, 0.85, &mut entries);
    compile(CULTURAL, EntityType::Cultural, 0.8, &mut entries);
    compile(THINGS, EntityType::Thing, 0.7, &mut entries);
    entries
});
