//! Built-in demo catalog.
//!
//! Backs the memory catalog and is the default payload for `shopora seed`.
//! All products were added in January 2024; the day of month orders them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::{Category, ProductRecord};
use crate::types::{CategoryId, Price, ProductId, Slug};

struct CategorySeed {
    name: &'static str,
    description: &'static str,
    image: &'static str,
}

struct ProductSeed {
    name: &'static str,
    cents: u32,
    description: &'static str,
    category: i32,
    keywords: [&'static str; 2],
    stock: u32,
    featured: bool,
    tags: &'static [&'static str],
    specifications: &'static [(&'static str, &'static str)],
    day: u32,
}

const CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        name: "Lighting",
        description: "Modern lighting solutions",
        image: "https://images.unsplash.com/photo-1513506003901-1e6a226e6d23?w=400",
    },
    CategorySeed {
        name: "Electronics",
        description: "Modern electronics and gadgets",
        image: "https://images.unsplash.com/photo-1498049794561-7780e7231661?w=400",
    },
    CategorySeed {
        name: "Furniture",
        description: "Minimalist furniture for modern living",
        image: "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=400",
    },
    CategorySeed {
        name: "Accessories",
        description: "Everyday accessories and essentials",
        image: "https://images.unsplash.com/photo-1524863479829-916d8e77f114?w=400",
    },
    CategorySeed {
        name: "Fashion",
        description: "Contemporary fashion and style",
        image: "https://images.unsplash.com/photo-1441986300917-64674bd600d8?w=400",
    },
];

const PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        name: "Minimalist Desk Lamp",
        cents: 8999,
        description: "A sleek and modern desk lamp with adjustable brightness and color temperature. Perfect for any workspace.",
        category: 1,
        keywords: ["desk-lamp,minimal", "lamp,workspace"],
        stock: 25,
        featured: true,
        tags: &["lighting", "desk", "modern", "LED"],
        specifications: &[
            ("Material", "Aluminum"),
            ("Dimensions", "12\" x 6\" x 18\""),
            ("Power", "12W LED"),
            ("Color Temperature", "2700K - 6500K"),
        ],
        day: 15,
    },
    ProductSeed {
        name: "Wireless Charging Pad",
        cents: 3499,
        description: "Fast wireless charging pad compatible with all Qi-enabled devices. Minimalist design with premium materials.",
        category: 2,
        keywords: ["wireless-charger,phone", "charging-pad,desk"],
        stock: 50,
        featured: true,
        tags: &["wireless", "charging", "electronics", "Qi"],
        specifications: &[
            ("Output", "15W Max"),
            ("Compatibility", "Qi-enabled devices"),
            ("Material", "Premium fabric"),
            ("Safety", "Overcharge protection"),
        ],
        day: 10,
    },
    ProductSeed {
        name: "Minimalist Coffee Table",
        cents: 29999,
        description: "Clean lines and natural materials define this minimalist coffee table. Perfect centerpiece for modern living rooms.",
        category: 3,
        keywords: ["coffee-table,minimalist", "living-room,coffee-table"],
        stock: 15,
        featured: true,
        tags: &["furniture", "table", "modern", "minimalist"],
        specifications: &[
            ("Material", "Oak wood"),
            ("Dimensions", "48\" x 24\" x 16\""),
            ("Finish", "Natural oil"),
            ("Assembly", "Required"),
        ],
        day: 5,
    },
    ProductSeed {
        name: "Leather Wallet",
        cents: 5999,
        description: "Handcrafted leather wallet with RFID protection. Slim profile with multiple card slots and cash compartment.",
        category: 4,
        keywords: ["leather-wallet,minimal", "wallet,leather"],
        stock: 40,
        featured: false,
        tags: &["wallet", "leather", "accessories", "RFID"],
        specifications: &[
            ("Material", "Genuine leather"),
            ("Dimensions", "4.25\" x 3.25\" x 0.25\""),
            ("Card Slots", "8"),
            ("Features", "RFID protection"),
        ],
        day: 8,
    },
    ProductSeed {
        name: "Smart Speaker",
        cents: 12999,
        description: "Premium smart speaker with exceptional sound quality and voice assistant integration. Minimalist aesthetic.",
        category: 2,
        keywords: ["smart-speaker,minimal", "speaker,home-audio"],
        stock: 30,
        featured: true,
        tags: &["speaker", "smart", "audio", "voice"],
        specifications: &[
            ("Power", "20W"),
            ("Connectivity", "Wi-Fi, Bluetooth"),
            ("Voice Assistant", "Compatible"),
            ("Dimensions", "6\" x 4\" x 4\""),
        ],
        day: 12,
    },
    ProductSeed {
        name: "Minimalist Bookshelf",
        cents: 18999,
        description: "Floating bookshelf with clean lines and hidden mounting hardware. Perfect for displaying books and decor.",
        category: 3,
        keywords: ["bookshelf,minimal", "floating-shelf,books"],
        stock: 20,
        featured: false,
        tags: &["bookshelf", "wall", "floating", "storage"],
        specifications: &[
            ("Material", "Bamboo"),
            ("Dimensions", "36\" x 8\" x 6\""),
            ("Weight Capacity", "50 lbs"),
            ("Installation", "Wall-mounted"),
        ],
        day: 3,
    },
    ProductSeed {
        name: "Ceramic Vase",
        cents: 4499,
        description: "Handcrafted ceramic vase with minimalist design. Perfect for fresh flowers or as a standalone decor piece.",
        category: 4,
        keywords: ["ceramic-vase,minimal", "vase,flowers"],
        stock: 35,
        featured: false,
        tags: &["vase", "ceramic", "decor", "handmade"],
        specifications: &[
            ("Material", "Ceramic"),
            ("Dimensions", "8\" x 4\""),
            ("Color", "Matte white"),
            ("Care", "Hand wash only"),
        ],
        day: 7,
    },
    ProductSeed {
        name: "Floor Lamp",
        cents: 14999,
        description: "Elegant floor lamp with adjustable arm and warm LED lighting. Creates the perfect ambiance for any room.",
        category: 1,
        keywords: ["floor-lamp,modern", "lamp,living-room"],
        stock: 18,
        featured: false,
        tags: &["lamp", "floor", "lighting", "modern"],
        specifications: &[
            ("Height", "64\""),
            ("Material", "Metal and fabric"),
            ("Bulb", "LED included"),
            ("Switch", "Foot pedal"),
        ],
        day: 11,
    },
    ProductSeed {
        name: "Classic Leather Jacket",
        cents: 18999,
        description: "Timeless leather jacket with modern tailoring. Perfect blend of classic style and contemporary comfort.",
        category: 5,
        keywords: ["leather-jacket,fashion", "jacket,style"],
        stock: 25,
        featured: true,
        tags: &["jacket", "leather", "fashion", "classic"],
        specifications: &[
            ("Material", "Genuine leather"),
            ("Fit", "Regular fit"),
            ("Care", "Professional dry clean only"),
            ("Sizes", "S, M, L, XL"),
        ],
        day: 20,
    },
    ProductSeed {
        name: "Designer Sunglasses",
        cents: 15999,
        description: "Premium sunglasses with UV protection and minimalist frame. Essential accessory for modern style.",
        category: 5,
        keywords: ["sunglasses,fashion", "sunglasses,minimal"],
        stock: 40,
        featured: true,
        tags: &["sunglasses", "accessories", "fashion", "UV protection"],
        specifications: &[
            ("Lens", "Polarized"),
            ("UV Protection", "UV400"),
            ("Frame", "Acetate"),
            ("Included", "Protective case"),
        ],
        day: 18,
    },
    ProductSeed {
        name: "Minimalist Watch",
        cents: 29999,
        description: "Clean and sophisticated timepiece with minimalist dial design. Japanese movement with premium materials.",
        category: 5,
        keywords: ["watch,minimalist", "wristwatch,timepiece"],
        stock: 15,
        featured: true,
        tags: &["watch", "minimalist", "japanese", "timepiece"],
        specifications: &[
            ("Movement", "Japanese automatic"),
            ("Case", "Stainless steel"),
            ("Water Resistance", "50m"),
            ("Crystal", "Sapphire"),
        ],
        day: 22,
    },
    ProductSeed {
        name: "Canvas Tote Bag",
        cents: 7999,
        description: "Durable canvas tote bag with minimalist design. Perfect for daily use and eco-conscious consumers.",
        category: 5,
        keywords: ["tote-bag,canvas", "bag,minimal"],
        stock: 30,
        featured: false,
        tags: &["bag", "tote", "canvas", "eco-friendly"],
        specifications: &[
            ("Material", "Heavy-duty canvas"),
            ("Dimensions", "16\" x 14\" x 6\""),
            ("Strap", "Adjustable canvas"),
            ("Pockets", "Interior zip pocket"),
        ],
        day: 25,
    },
    ProductSeed {
        name: "Modern Office Chair",
        cents: 44999,
        description: "Ergonomic office chair with breathable mesh back and adjustable height. Designed for all-day comfort.",
        category: 3,
        keywords: ["office-chair,modern", "chair,ergonomic"],
        stock: 20,
        featured: true,
        tags: &["chair", "office", "ergonomic", "modern"],
        specifications: &[
            ("Material", "Mesh and aluminum"),
            ("Height Adjustment", "Yes"),
            ("Armrests", "3D adjustable"),
            ("Base", "5-wheel casters"),
        ],
        day: 14,
    },
    ProductSeed {
        name: "Minimalist Dining Table",
        cents: 59999,
        description: "Scandinavian-inspired dining table with clean lines and natural wood finish. Seats 6 people comfortably.",
        category: 3,
        keywords: ["dining-table,scandinavian", "table,wood"],
        stock: 10,
        featured: true,
        tags: &["table", "dining", "scandinavian", "wood"],
        specifications: &[
            ("Material", "Solid oak"),
            ("Dimensions", "72\" x 36\" x 29\""),
            ("Seats", "6"),
            ("Finish", "Natural oil"),
            ("Assembly", "Simple assembly required"),
        ],
        day: 9,
    },
    ProductSeed {
        name: "Platform Bed Frame",
        cents: 34999,
        description: "Minimalist platform bed frame with hidden storage and clean lines. No box spring needed.",
        category: 3,
        keywords: ["bed-frame,minimal", "bedroom,platform-bed"],
        stock: 12,
        featured: false,
        tags: &["bed", "platform", "minimalist", "storage"],
        specifications: &[
            ("Material", "Solid wood"),
            ("Sizes", "Twin, Full, Queen, King"),
            ("Storage", "Under-bed storage"),
            ("Foundation", "Platform design"),
        ],
        day: 16,
    },
    ProductSeed {
        name: "Minimalist Backpack",
        cents: 8999,
        description: "Clean and functional backpack with laptop compartment and hidden pockets. Perfect for work or travel.",
        category: 4,
        keywords: ["backpack,minimal", "bag,travel-backpack"],
        stock: 35,
        featured: true,
        tags: &["backpack", "travel", "work", "minimalist"],
        specifications: &[
            ("Material", "Water-resistant nylon"),
            ("Laptop Compartment", "Padded sleeve for 15\" laptop"),
            ("Dimensions", "18\" x 12\" x 6\""),
            ("Features", "Hidden side pockets, water bottle holder"),
        ],
        day: 17,
    },
    ProductSeed {
        name: "Wireless Earbuds",
        cents: 12999,
        description: "Premium wireless earbuds with active noise cancellation and crystal-clear sound. Minimalist charging case.",
        category: 4,
        keywords: ["wireless-earbuds,audio", "earbuds,headphones"],
        stock: 45,
        featured: true,
        tags: &["earbuds", "wireless", "audio", "ANC"],
        specifications: &[
            ("Battery Life", "Up to 8 hours"),
            ("Charging", "USB-C wireless charging"),
            ("Connectivity", "Bluetooth 5.0"),
            ("Features", "Active noise cancellation, touch controls"),
        ],
        day: 19,
    },
];

/// Midnight UTC on the given day of January 2024.
fn january_2024(day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

/// The demo categories, IDs starting at 1 in sort order.
#[must_use]
pub fn categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .zip(1..)
        .filter_map(|(seed, id)| {
            Some(Category {
                id: CategoryId::new(id),
                name: seed.name.to_owned(),
                slug: Slug::from_name(seed.name).ok()?,
                description: seed.description.to_owned(),
                image: Some(seed.image.to_owned()),
                is_active: true,
                sort_order: id,
            })
        })
        .collect()
}

/// The demo products, IDs starting at 1.
#[must_use]
pub fn product_records() -> Vec<ProductRecord> {
    PRODUCTS
        .iter()
        .zip(1..)
        .map(|(seed, id)| {
            let created_at = january_2024(seed.day);
            let images = seed
                .keywords
                .iter()
                .zip([id, id + 100])
                .map(|(keywords, sig)| {
                    format!("https://source.unsplash.com/featured/800x800?{keywords}&sig={sig}")
                })
                .collect();

            ProductRecord {
                id: ProductId::new(id),
                name: seed.name.to_owned(),
                price: Price::from_cents(seed.cents),
                description: seed.description.to_owned(),
                category_id: CategoryId::new(seed.category),
                images,
                stock: seed.stock,
                featured: seed.featured,
                tags: seed.tags.iter().map(|t| (*t).to_owned()).collect(),
                specifications: seed
                    .specifications
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect::<BTreeMap<_, _>>(),
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
