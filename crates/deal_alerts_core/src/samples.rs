//! Fixed seed deals used until a real acquisition source feeds the store.

use crate::contract::NewDeal;

struct SampleDeal {
    destination: &'static str,
    image_url: &'static str,
    current_price: i32,
    original_price: i32,
    discount: i32,
    url: &'static str,
}

const SAMPLE_DEALS: [SampleDeal; 3] = [
    SampleDeal {
        destination: "Мальдивы",
        image_url: "https://images.unsplash.com/photo-1514282401047-d79a71a590e8?w=400",
        current_price: 1299,
        original_price: 2599,
        discount: 50,
        url: "https://travelata.ru/deal/maldives",
    },
    SampleDeal {
        destination: "Турция, Анталия",
        image_url: "https://images.unsplash.com/photo-1524231757912-21f4fe3a7200?w=400",
        current_price: 899,
        original_price: 1899,
        discount: 53,
        url: "https://travelata.ru/deal/turkey",
    },
    SampleDeal {
        destination: "ОАЭ, Дубай",
        image_url: "https://images.unsplash.com/photo-1512453979798-5ea266f8880c?w=400",
        current_price: 1599,
        original_price: 3299,
        discount: 52,
        url: "https://travelata.ru/deal/dubai",
    },
];

pub fn sample_deals() -> Vec<NewDeal> {
    SAMPLE_DEALS
        .iter()
        .map(|sample| NewDeal {
            destination: sample.destination.to_string(),
            image_url: Some(sample.image_url.to_string()),
            current_price: sample.current_price,
            original_price: sample.original_price,
            discount: sample.discount,
            url: sample.url.to_string(),
        })
        .collect()
}
