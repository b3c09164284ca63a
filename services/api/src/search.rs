//! Hotel search filters, sorting and pagination
//!
//! Untrusted query-string input is narrowed into the strongly-typed
//! [`SearchFilters`] before it gets anywhere near a store: every filter
//! is an independently optional named field, and numeric-looking
//! parameters that fail to parse are treated as absent rather than
//! failing the request. Filter categories combine with logical AND; an
//! absent filter imposes no constraint.

use serde::Deserialize;

use crate::models::{Hotel, Pagination};

/// Number of hotels returned per search page
pub const PAGE_SIZE: u32 = 5;

/// Raw query-string parameters as sent by the client
///
/// Multi-valued keys (`facilities`, `types`, `stars`) may repeat.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub destination: Option<String>,
    pub adult_count: Option<String>,
    pub child_count: Option<String>,
    pub facilities: Vec<String>,
    pub types: Vec<String>,
    pub stars: Vec<String>,
    pub max_price: Option<String>,
    pub sort_option: Option<String>,
    pub page: Option<String>,
}

/// Typed search filters, one named optional field per category
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SearchFilters {
    /// Case-insensitive substring matched against city OR country
    pub destination: Option<String>,
    /// Inclusive lower bound on adult capacity
    pub min_adults: Option<i32>,
    /// Inclusive lower bound on child capacity
    pub min_children: Option<i32>,
    /// Hotel must carry ALL of these facility tags
    pub facilities: Vec<String>,
    /// Hotel type must be one of these
    pub types: Vec<String>,
    /// Star rating must be one of these
    pub stars: Vec<i32>,
    /// Inclusive upper bound on nightly price
    pub max_price: Option<i64>,
}

impl SearchFilters {
    /// Build filters from raw parameters, dropping anything unparseable
    pub fn from_params(params: &SearchParams) -> Self {
        SearchFilters {
            destination: params
                .destination
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            min_adults: parse_opt(&params.adult_count),
            min_children: parse_opt(&params.child_count),
            facilities: params.facilities.clone(),
            types: params.types.clone(),
            // Unparseable star values are dropped individually
            stars: params
                .stars
                .iter()
                .filter_map(|s| s.trim().parse().ok())
                .collect(),
            max_price: parse_opt(&params.max_price),
        }
    }

    /// Whether a hotel satisfies every present filter
    pub fn matches(&self, hotel: &Hotel) -> bool {
        if let Some(destination) = &self.destination {
            let needle = destination.to_lowercase();
            let in_city = hotel.city.to_lowercase().contains(&needle);
            let in_country = hotel.country.to_lowercase().contains(&needle);
            if !in_city && !in_country {
                return false;
            }
        }

        if let Some(min) = self.min_adults {
            if hotel.adult_count < min {
                return false;
            }
        }

        if let Some(min) = self.min_children {
            if hotel.child_count < min {
                return false;
            }
        }

        if !self.facilities.is_empty()
            && !self
                .facilities
                .iter()
                .all(|required| hotel.facilities.contains(required))
        {
            return false;
        }

        if !self.types.is_empty() && !self.types.contains(&hotel.hotel_type) {
            return false;
        }

        if !self.stars.is_empty() && !self.stars.contains(&hotel.star_rating) {
            return false;
        }

        if let Some(max) = self.max_price {
            if hotel.price_per_night > max {
                return false;
            }
        }

        true
    }
}

fn parse_opt<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_deref().and_then(|s| s.trim().parse().ok())
}

/// Result ordering selected by the `sortOption` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    Unsorted,
    /// Star rating, highest first
    StarRating,
    PricePerNightAsc,
    PricePerNightDesc,
}

impl SortOption {
    /// Parse the wire value; anything unrecognized leaves results unsorted
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("starRating") => SortOption::StarRating,
            Some("pricePerNightAsc") => SortOption::PricePerNightAsc,
            Some("pricePerNightDesc") => SortOption::PricePerNightDesc,
            _ => SortOption::Unsorted,
        }
    }
}

/// Sort hotels in place according to the selected option
pub fn sort_hotels(hotels: &mut [Hotel], sort: SortOption) {
    match sort {
        SortOption::Unsorted => {}
        SortOption::StarRating => hotels.sort_by(|a, b| b.star_rating.cmp(&a.star_rating)),
        SortOption::PricePerNightAsc => {
            hotels.sort_by(|a, b| a.price_per_night.cmp(&b.price_per_night))
        }
        SortOption::PricePerNightDesc => {
            hotels.sort_by(|a, b| b.price_per_night.cmp(&a.price_per_night))
        }
    }
}

/// Parse the 1-based page number; non-numeric or non-positive input
/// falls back to the first page
pub fn page_number(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// Pagination envelope for a page of `total` matches
///
/// `pages` is the ceiling of `total / PAGE_SIZE`; a page past the end is
/// legal and simply comes back empty.
pub fn paginate(total: u64, page: u32) -> Pagination {
    let pages = total.div_ceil(u64::from(PAGE_SIZE)) as u32;
    Pagination { total, page, pages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn hotel(city: &str, country: &str) -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Test Hotel".to_string(),
            city: city.to_string(),
            country: country.to_string(),
            description: String::new(),
            hotel_type: "Hotel".to_string(),
            price_per_night: 100,
            star_rating: 3,
            adult_count: 2,
            child_count: 0,
            facilities: vec![],
            image_urls: vec![],
            last_updated: Utc::now(),
            bookings: vec![],
        }
    }

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let mut p = SearchParams::default();
        for (key, value) in pairs {
            match *key {
                "destination" => p.destination = Some(value.to_string()),
                "adultCount" => p.adult_count = Some(value.to_string()),
                "childCount" => p.child_count = Some(value.to_string()),
                "facilities" => p.facilities.push(value.to_string()),
                "types" => p.types.push(value.to_string()),
                "stars" => p.stars.push(value.to_string()),
                "maxPrice" => p.max_price = Some(value.to_string()),
                other => panic!("unknown key {}", other),
            }
        }
        p
    }

    #[test]
    fn test_destination_matches_city_or_country_case_insensitively() {
        let filters = SearchFilters::from_params(&params(&[("destination", "Paris")]));

        assert!(filters.matches(&hotel("paris", "France")));
        assert!(filters.matches(&hotel("Nice", "PARIS"))); // country side of the OR
        assert!(!filters.matches(&hotel("Lyon", "France")));
    }

    #[test]
    fn test_destination_substring_match() {
        let filters = SearchFilters::from_params(&params(&[("destination", "ari")]));
        assert!(filters.matches(&hotel("Paris", "France")));
    }

    #[test]
    fn test_facilities_require_all_tags() {
        let filters =
            SearchFilters::from_params(&params(&[("facilities", "wifi"), ("facilities", "parking")]));

        let mut only_wifi = hotel("Paris", "France");
        only_wifi.facilities = vec!["wifi".to_string()];
        assert!(!filters.matches(&only_wifi));

        let mut both = only_wifi.clone();
        both.facilities.push("parking".to_string());
        assert!(filters.matches(&both));
    }

    #[test]
    fn test_types_match_any_of_set() {
        let filters =
            SearchFilters::from_params(&params(&[("types", "Hostel"), ("types", "Motel")]));

        let mut hostel = hotel("Paris", "France");
        hostel.hotel_type = "Hostel".to_string();
        assert!(filters.matches(&hostel));

        let mut resort = hotel("Paris", "France");
        resort.hotel_type = "Resort".to_string();
        assert!(!filters.matches(&resort));
    }

    #[test]
    fn test_stars_match_any_of_set() {
        let filters = SearchFilters::from_params(&params(&[("stars", "4"), ("stars", "5")]));

        let mut four_star = hotel("Paris", "France");
        four_star.star_rating = 4;
        assert!(filters.matches(&four_star));

        let mut three_star = hotel("Paris", "France");
        three_star.star_rating = 3;
        assert!(!filters.matches(&three_star));
    }

    #[test]
    fn test_max_price_is_inclusive_upper_bound() {
        let filters = SearchFilters::from_params(&params(&[("maxPrice", "100")]));

        let at_limit = hotel("Paris", "France"); // priced at 100
        assert!(filters.matches(&at_limit));

        let mut over = hotel("Paris", "France");
        over.price_per_night = 150;
        assert!(!filters.matches(&over));
    }

    #[test]
    fn test_capacity_bounds_are_inclusive() {
        let filters =
            SearchFilters::from_params(&params(&[("adultCount", "2"), ("childCount", "0")]));
        assert!(filters.matches(&hotel("Paris", "France")));

        let stricter = SearchFilters::from_params(&params(&[("adultCount", "3")]));
        assert!(!stricter.matches(&hotel("Paris", "France")));
    }

    #[test]
    fn test_absent_filters_impose_no_constraint() {
        let filters = SearchFilters::from_params(&SearchParams::default());
        assert!(filters.matches(&hotel("Anywhere", "Atlantis")));
    }

    // Tolerant-parsing policy: numeric-looking parameters that do not
    // parse are treated as absent, never as a request failure.
    #[test]
    fn test_non_numeric_input_is_treated_as_absent() {
        let filters = SearchFilters::from_params(&params(&[
            ("adultCount", "lots"),
            ("maxPrice", "12x"),
            ("stars", "four"),
        ]));

        assert_eq!(filters.min_adults, None);
        assert_eq!(filters.max_price, None);
        assert!(filters.stars.is_empty());
        assert!(filters.matches(&hotel("Paris", "France")));
    }

    #[test]
    fn test_page_number_tolerant_parse() {
        assert_eq!(page_number(Some("3")), 3);
        assert_eq!(page_number(Some("0")), 1);
        assert_eq!(page_number(Some("-2")), 1);
        assert_eq!(page_number(Some("abc")), 1);
        assert_eq!(page_number(None), 1);
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!(SortOption::parse(Some("starRating")), SortOption::StarRating);
        assert_eq!(
            SortOption::parse(Some("pricePerNightAsc")),
            SortOption::PricePerNightAsc
        );
        assert_eq!(
            SortOption::parse(Some("pricePerNightDesc")),
            SortOption::PricePerNightDesc
        );
        assert_eq!(SortOption::parse(Some("bogus")), SortOption::Unsorted);
        assert_eq!(SortOption::parse(None), SortOption::Unsorted);
    }

    #[test]
    fn test_sort_hotels_orderings() {
        let mut hotels: Vec<Hotel> = [(50, 5), (150, 2), (100, 4)]
            .iter()
            .map(|&(price, stars)| {
                let mut h = hotel("Paris", "France");
                h.price_per_night = price;
                h.star_rating = stars;
                h
            })
            .collect();

        sort_hotels(&mut hotels, SortOption::PricePerNightAsc);
        let prices: Vec<i64> = hotels.iter().map(|h| h.price_per_night).collect();
        assert_eq!(prices, vec![50, 100, 150]);

        sort_hotels(&mut hotels, SortOption::PricePerNightDesc);
        let prices: Vec<i64> = hotels.iter().map(|h| h.price_per_night).collect();
        assert_eq!(prices, vec![150, 100, 50]);

        sort_hotels(&mut hotels, SortOption::StarRating);
        let stars: Vec<i32> = hotels.iter().map(|h| h.star_rating).collect();
        assert_eq!(stars, vec![5, 4, 2]);
    }

    #[test]
    fn test_paginate_ceiling_division() {
        assert_eq!(
            paginate(12, 1),
            Pagination {
                total: 12,
                page: 1,
                pages: 3
            }
        );
        assert_eq!(paginate(10, 2).pages, 2);
        assert_eq!(paginate(0, 1).pages, 0);
    }
}
