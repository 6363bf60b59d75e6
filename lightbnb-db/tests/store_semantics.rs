//! Behavior tests for the storage operations, run against the in-memory
//! backend. The Postgres backend answers the same trait calls; its tests
//! live beside the repositories and need a running database.

use chrono::{Days, NaiveDate, Utc};
use lightbnb_db::{
    MemoryStore, NewProperty, NewUser, PasswordMode, PropertyFilters, Store, PLACEHOLDER_PASSWORD,
};

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "s3cret".to_string(),
    }
}

fn new_property(owner_id: i32, title: &str, city: &str, cost_cents: Option<i32>) -> NewProperty {
    NewProperty {
        owner_id,
        title: title.to_string(),
        description: "A place to stay".to_string(),
        thumbnail_photo_url: "https://example.com/thumb.jpg".to_string(),
        cover_photo_url: "https://example.com/cover.jpg".to_string(),
        cost_per_night: cost_cents,
        parking_spaces: Some(1),
        number_of_bathrooms: Some(1),
        number_of_bedrooms: Some(2),
        country: "Canada".to_string(),
        street: "1 Test St".to_string(),
        city: city.to_string(),
        province: "BC".to_string(),
        post_code: "V0V 0V0".to_string(),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// ==== Users ====

#[tokio::test]
async fn missing_user_lookups_return_none() {
    let store = MemoryStore::new();
    assert!(store
        .user_with_email("ghost@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(store.user_with_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn registered_user_found_by_email_and_id() {
    let store = MemoryStore::new();
    let created = store
        .add_user(new_user("Alice", "alice@example.com"))
        .await
        .unwrap();
    assert!(created.id > 0);

    let by_email = store
        .user_with_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email, created);

    let by_id = store.user_with_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    // Email matching is exact; a different case is a different address.
    assert!(store
        .user_with_email("ALICE@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let store = MemoryStore::new();
    store
        .add_user(new_user("Alice", "alice@example.com"))
        .await
        .unwrap();
    let err = store
        .add_user(new_user("Alice Again", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
async fn default_mode_stores_placeholder_password() {
    let store = MemoryStore::new();
    let user = store
        .add_user(new_user("Bob", "bob@example.com"))
        .await
        .unwrap();
    assert_eq!(user.password, PLACEHOLDER_PASSWORD);

    let looked_up = store
        .user_with_email("bob@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(looked_up.password, PLACEHOLDER_PASSWORD);
}

#[tokio::test]
async fn supplied_mode_stores_given_password() {
    let store = MemoryStore::with_password_mode(PasswordMode::Supplied);
    let user = store
        .add_user(new_user("Carol", "carol@example.com"))
        .await
        .unwrap();
    assert_eq!(user.password, "s3cret");
}

// ==== Reservations ====

#[tokio::test]
async fn completed_reservations_exclude_current_and_future_stays() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    let guest = store
        .add_user(new_user("Guest", "guest@example.com"))
        .await
        .unwrap();
    let cabin = store
        .add_property(new_property(owner.id, "Cabin", "Testville", Some(8000)))
        .await
        .unwrap();
    store.add_review(cabin.id, 4);

    let today = Utc::now().date_naive();
    // Ended yesterday: completed.
    store.add_reservation(guest.id, cabin.id, today - Days::new(8), today - Days::new(1));
    // Ends today: still underway.
    store.add_reservation(guest.id, cabin.id, today - Days::new(5), today);
    // Booked for later this year.
    store.add_reservation(
        guest.id,
        cabin.id,
        today + Days::new(30),
        today + Days::new(37),
    );

    let stays = store.reservations_for_guest(guest.id, None).await.unwrap();
    assert_eq!(stays.len(), 1);
    assert_eq!(stays[0].reservation.end_date, today - Days::new(1));
}

#[tokio::test]
async fn completed_reservations_come_back_oldest_first_with_property_details() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    let guest = store
        .add_user(new_user("Guest", "guest@example.com"))
        .await
        .unwrap();

    let cabin = store
        .add_property(new_property(owner.id, "Cabin", "Testville", Some(8000)))
        .await
        .unwrap();
    store.add_review(cabin.id, 3);
    store.add_review(cabin.id, 5);

    let loft = store
        .add_property(new_property(owner.id, "Loft", "Testville", Some(12000)))
        .await
        .unwrap();
    store.add_review(loft.id, 5);

    // Inserted newest first; listing must come back oldest first.
    store.add_reservation(guest.id, loft.id, date(2016, 3, 5), date(2016, 3, 12));
    store.add_reservation(guest.id, cabin.id, date(2014, 10, 21), date(2014, 10, 28));

    let stays = store.reservations_for_guest(guest.id, None).await.unwrap();
    assert_eq!(stays.len(), 2);
    assert_eq!(stays[0].reservation.start_date, date(2014, 10, 21));
    assert_eq!(stays[0].title, "Cabin");
    assert_eq!(stays[0].cost_per_night, 8000);
    assert_eq!(stays[0].average_rating, 4.0);
    assert_eq!(stays[1].title, "Loft");
    assert_eq!(stays[1].average_rating, 5.0);

    // Another guest sees none of these stays.
    let other = store
        .add_user(new_user("Other", "other@example.com"))
        .await
        .unwrap();
    assert!(store
        .reservations_for_guest(other.id, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn reservations_at_unreviewed_properties_are_hidden() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    let guest = store
        .add_user(new_user("Guest", "guest@example.com"))
        .await
        .unwrap();
    let silent = store
        .add_property(new_property(owner.id, "Never reviewed", "Testville", Some(6000)))
        .await
        .unwrap();

    store.add_reservation(guest.id, silent.id, date(2019, 6, 1), date(2019, 6, 8));

    let stays = store.reservations_for_guest(guest.id, None).await.unwrap();
    assert!(stays.is_empty());
}

#[tokio::test]
async fn reservation_listing_honors_limit_and_default() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    let guest = store
        .add_user(new_user("Guest", "guest@example.com"))
        .await
        .unwrap();
    let cabin = store
        .add_property(new_property(owner.id, "Cabin", "Testville", Some(8000)))
        .await
        .unwrap();
    store.add_review(cabin.id, 4);

    for offset in 0..12u32 {
        store.add_reservation(
            guest.id,
            cabin.id,
            date(2015, 1, 1 + offset),
            date(2015, 1, 2 + offset),
        );
    }

    let defaulted = store.reservations_for_guest(guest.id, None).await.unwrap();
    assert_eq!(defaulted.len(), 10);
    // The oldest stays survive the cut.
    assert_eq!(defaulted[0].reservation.start_date, date(2015, 1, 1));
    assert_eq!(defaulted[9].reservation.start_date, date(2015, 1, 10));

    let limited = store
        .reservations_for_guest(guest.id, Some(3))
        .await
        .unwrap();
    assert_eq!(limited.len(), 3);

    let all = store
        .reservations_for_guest(guest.id, Some(50))
        .await
        .unwrap();
    assert_eq!(all.len(), 12);
}

#[tokio::test]
async fn negative_limits_return_no_rows() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Olive", "olive@example.com"))
        .await
        .unwrap();
    let guest = store
        .add_user(new_user("Gus", "gus@example.com"))
        .await
        .unwrap();
    let property = store
        .add_property(new_property(owner.id, "Loft", "Kelowna", Some(8000)))
        .await
        .unwrap();
    store.add_review(property.id, 4);
    let today = Utc::now().date_naive();
    store.add_reservation(
        guest.id,
        property.id,
        today - Days::new(9),
        today - Days::new(2),
    );

    let stays = store
        .reservations_for_guest(guest.id, Some(-1))
        .await
        .unwrap();
    assert!(stays.is_empty());

    let listings = store
        .search_properties(&PropertyFilters::default(), Some(-1))
        .await
        .unwrap();
    assert!(listings.is_empty());
}

// ==== Property search ====

#[tokio::test]
async fn search_matches_city_substring_case_insensitively() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    let van = store
        .add_property(new_property(owner.id, "Van loft", "North Vancouver", Some(9000)))
        .await
        .unwrap();
    let tor = store
        .add_property(new_property(owner.id, "Tor flat", "Toronto", Some(7000)))
        .await
        .unwrap();
    store.add_review(van.id, 4);
    store.add_review(tor.id, 4);

    let filters = PropertyFilters {
        city: Some("vancou".to_string()),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "Van loft");
}

#[tokio::test]
async fn search_price_band_is_inclusive_and_in_whole_units() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    for (title, cents) in [("Budget", 5000), ("Mid", 9000), ("Grand", 20000)] {
        let property = store
            .add_property(new_property(owner.id, title, "Testville", Some(cents)))
            .await
            .unwrap();
        store.add_review(property.id, 4);
    }

    // 50..=90 in whole units is 5000..=9000 in stored cents; both ends land
    // exactly on a property and both must match.
    let filters = PropertyFilters {
        minimum_price_per_night: Some(50),
        maximum_price_per_night: Some(90),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    let titles: Vec<&str> = listings
        .iter()
        .map(|listing| listing.property.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Budget", "Mid"]);
}

#[tokio::test]
async fn search_accepts_extreme_price_bounds() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner.extreme@example.com"))
        .await
        .unwrap();
    let property = store
        .add_property(new_property(owner.id, "Affordable", "Halifax", Some(9000)))
        .await
        .unwrap();
    store.add_review(property.id, 4);

    // A bound near i32::MAX still converts to cents without wrapping, so
    // the filter excludes the listing instead of panicking.
    let floor = PropertyFilters {
        minimum_price_per_night: Some(i32::MAX / 50),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&floor, None).await.unwrap();
    assert!(listings.is_empty());

    let ceiling = PropertyFilters {
        maximum_price_per_night: Some(i32::MAX),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&ceiling, None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "Affordable");
}

#[tokio::test]
async fn search_minimum_rating_compares_against_average() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();

    let low = store
        .add_property(new_property(owner.id, "Low", "Testville", Some(5000)))
        .await
        .unwrap();
    store.add_review(low.id, 2);

    // Individual ratings straddle the threshold; the average is what counts.
    let mixed = store
        .add_property(new_property(owner.id, "Mixed", "Testville", Some(6000)))
        .await
        .unwrap();
    store.add_review(mixed.id, 3);
    store.add_review(mixed.id, 5);

    let high = store
        .add_property(new_property(owner.id, "High", "Testville", Some(7000)))
        .await
        .unwrap();
    store.add_review(high.id, 4);
    store.add_review(high.id, 5);

    let filters = PropertyFilters {
        minimum_rating: Some(4),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    let titles: Vec<&str> = listings
        .iter()
        .map(|listing| listing.property.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Mixed", "High"]);
}

#[tokio::test]
async fn search_excludes_unreviewed_properties() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();
    let reviewed = store
        .add_property(new_property(owner.id, "Reviewed", "Testville", Some(5000)))
        .await
        .unwrap();
    store.add_review(reviewed.id, 3);
    store
        .add_property(new_property(owner.id, "Unreviewed", "Testville", Some(100)))
        .await
        .unwrap();

    let listings = store
        .search_properties(&PropertyFilters::default(), None)
        .await
        .unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "Reviewed");
    assert_eq!(listings[0].average_rating, 3.0);
}

#[tokio::test]
async fn search_filters_by_owner() {
    let store = MemoryStore::new();
    let first = store
        .add_user(new_user("First Owner", "first@example.com"))
        .await
        .unwrap();
    let second = store
        .add_user(new_user("Second Owner", "second@example.com"))
        .await
        .unwrap();

    let mine = store
        .add_property(new_property(first.id, "Mine", "Testville", Some(5000)))
        .await
        .unwrap();
    let theirs = store
        .add_property(new_property(second.id, "Theirs", "Testville", Some(5000)))
        .await
        .unwrap();
    store.add_review(mine.id, 4);
    store.add_review(theirs.id, 4);

    let filters = PropertyFilters {
        owner_id: Some(first.id),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "Mine");
}

#[tokio::test]
async fn search_with_city_and_owner_returns_intersection() {
    // The legacy query built owner_id into its own WHERE clause and produced
    // invalid SQL when combined with any other filter. Combined filters must
    // simply intersect.
    let store = MemoryStore::new();
    let first = store
        .add_user(new_user("First Owner", "first@example.com"))
        .await
        .unwrap();
    let second = store
        .add_user(new_user("Second Owner", "second@example.com"))
        .await
        .unwrap();

    for (owner_id, title, city) in [
        (first.id, "First in Riverside", "Riverside"),
        (first.id, "First in Mountain View", "Mountain View"),
        (second.id, "Second in Riverside", "Riverside"),
    ] {
        let property = store
            .add_property(new_property(owner_id, title, city, Some(8000)))
            .await
            .unwrap();
        store.add_review(property.id, 4);
    }

    let filters = PropertyFilters {
        city: Some("Riverside".to_string()),
        owner_id: Some(first.id),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "First in Riverside");
}

#[tokio::test]
async fn search_orders_by_cost_and_honors_limit() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();

    // Insert in scrambled price order; twelve listings in all.
    let costs = [
        20000, 5000, 9000, 15000, 7000, 11000, 3000, 18000, 6000, 13000, 4000, 10000,
    ];
    for (index, cents) in costs.iter().enumerate() {
        let property = store
            .add_property(new_property(
                owner.id,
                &format!("Listing {index}"),
                "Testville",
                Some(*cents),
            ))
            .await
            .unwrap();
        store.add_review(property.id, 4);
    }

    let defaulted = store
        .search_properties(&PropertyFilters::default(), None)
        .await
        .unwrap();
    assert_eq!(defaulted.len(), 10);
    let prices: Vec<i32> = defaulted
        .iter()
        .map(|listing| listing.property.cost_per_night)
        .collect();
    let mut sorted = prices.clone();
    sorted.sort_unstable();
    assert_eq!(prices, sorted);
    // The two most expensive listings fall past the default cut.
    assert!(!prices.contains(&20000));
    assert!(!prices.contains(&18000));

    let limited = store
        .search_properties(&PropertyFilters::default(), Some(2))
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].property.cost_per_night, 3000);
    assert_eq!(limited[1].property.cost_per_night, 4000);
}

#[tokio::test]
async fn search_combines_filters() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();

    for (title, city, cents, rating) in [
        ("Cheap but low-rated", "Riverside", 5000, 2),
        ("Right fit", "Riverside", 9000, 5),
        ("Too expensive", "Riverside", 20000, 5),
        ("Wrong city", "Mountain View", 9000, 5),
    ] {
        let property = store
            .add_property(new_property(owner.id, title, city, Some(cents)))
            .await
            .unwrap();
        store.add_review(property.id, rating);
    }

    let filters = PropertyFilters {
        city: Some("Riverside".to_string()),
        maximum_price_per_night: Some(100),
        minimum_rating: Some(4),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "Right fit");
}

// ==== Property creation ====

#[tokio::test]
async fn added_property_defaults_missing_numerics_to_zero() {
    let store = MemoryStore::new();
    let owner = store
        .add_user(new_user("Owner", "owner@example.com"))
        .await
        .unwrap();

    let mut input = new_property(owner.id, "Bare", "Testville", None);
    input.parking_spaces = None;
    input.number_of_bathrooms = None;
    input.number_of_bedrooms = None;

    let created = store.add_property(input).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.cost_per_night, 0);
    assert_eq!(created.parking_spaces, 0);
    assert_eq!(created.number_of_bathrooms, 0);
    assert_eq!(created.number_of_bedrooms, 0);

    // Once reviewed, the new listing turns up in searches.
    store.add_review(created.id, 3);
    let filters = PropertyFilters {
        city: Some("Testville".to_string()),
        ..PropertyFilters::default()
    };
    let listings = store.search_properties(&filters, None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.title, "Bare");
    assert_eq!(listings[0].average_rating, 3.0);
}
