//! Demo catalog written on first start.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{prelude::DateTimeWithTimeZone, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

use crate::booking::seat::TOTAL_SEATS;
use crate::catalog::BOOKING_WINDOW_DAYS;
use crate::entities::{movie, showtime, theater};

struct SeedMovie {
    title: &'static str,
    poster_url: &'static str,
    rating: f64,
    genres: &'static [&'static str],
    duration: i32,
    release_date: (i32, u32, u32),
    description: &'static str,
}

const MOVIES: [SeedMovie; 6] = [
    SeedMovie {
        title: "Avengers: Endgame",
        poster_url: "https://images.unsplash.com/photo-1635805737707-575885ab0820?w=300&h=450&fit=crop",
        rating: 8.4,
        genres: &["Action", "Adventure", "Drama"],
        duration: 181,
        release_date: (2019, 4, 26),
        description: "After the devastating events of Avengers: Infinity War, the universe is in ruins.",
    },
    SeedMovie {
        title: "Spider-Man: No Way Home",
        poster_url: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=300&h=450&fit=crop",
        rating: 8.2,
        genres: &["Action", "Adventure", "Sci-Fi"],
        duration: 148,
        release_date: (2021, 12, 17),
        description: "Spider-Man's identity is revealed and he can no longer separate his normal life from his superhero responsibilities.",
    },
    SeedMovie {
        title: "The Batman",
        poster_url: "https://images.unsplash.com/photo-1635863138275-d9864d73fda5?w=300&h=450&fit=crop",
        rating: 7.8,
        genres: &["Action", "Crime", "Drama"],
        duration: 176,
        release_date: (2022, 3, 4),
        description: "Batman ventures into Gotham City's underworld when a sadistic killer leaves behind a trail of cryptic clues.",
    },
    SeedMovie {
        title: "Dune",
        poster_url: "https://images.unsplash.com/photo-1440404653325-ab127d49abc1?w=300&h=450&fit=crop",
        rating: 8.0,
        genres: &["Action", "Adventure", "Drama"],
        duration: 155,
        release_date: (2021, 10, 22),
        description: "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset.",
    },
    SeedMovie {
        title: "Top Gun: Maverick",
        poster_url: "https://images.unsplash.com/photo-1583394838336-acd977736f90?w=300&h=450&fit=crop",
        rating: 8.3,
        genres: &["Action", "Drama"],
        duration: 130,
        release_date: (2022, 5, 27),
        description: "After thirty years, Maverick is still pushing the envelope as a top naval aviator.",
    },
    SeedMovie {
        title: "Black Panther",
        poster_url: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=300&h=450&fit=crop",
        rating: 7.3,
        genres: &["Action", "Adventure", "Sci-Fi"],
        duration: 134,
        release_date: (2018, 2, 16),
        description: "T'Challa, heir to the hidden but advanced kingdom of Wakanda, must step forward to lead his people.",
    },
];

/// (name, address, city)
const THEATERS: [(&str, &str, &str); 8] = [
    ("PVR Phoenix Palladium", "Lower Parel", "Mumbai"),
    ("INOX R-City", "Ghatkopar West", "Mumbai"),
    ("PVR Select Citywalk", "Saket", "Delhi"),
    ("INOX Nehru Place", "Nehru Place", "Delhi"),
    ("PVR Forum Mall", "Koramangala", "Bangalore"),
    ("Prasads Multiplex", "Necklace Road", "Hyderabad"),
    ("Sathyam Cinemas", "Royapettah", "Chennai"),
    ("E-Square", "University Road", "Pune"),
];

/// (hour, minute, ticket price)
const SLOTS: [(u32, u32, i64); 4] = [(10, 0, 180), (13, 30, 220), (18, 30, 300), (21, 45, 250)];

/// Writes movies, theaters and a week of showtimes when the catalog is empty.
/// Returns whether anything was written.
pub async fn seed_catalog(db: &DatabaseConnection) -> Result<bool, DbErr> {
    if movie::Entity::find().count(db).await? > 0 {
        return Ok(false);
    }

    let now = Utc::now().fixed_offset();
    let today = Utc::now().date_naive();
    let movie_ids: Vec<Uuid> = MOVIES.iter().map(|_| Uuid::new_v4()).collect();
    let theater_ids: Vec<Uuid> = THEATERS.iter().map(|_| Uuid::new_v4()).collect();

    let movies: Vec<movie::ActiveModel> = MOVIES
        .iter()
        .zip(&movie_ids)
        .map(|(m, id)| movie::ActiveModel {
            id: Set(*id),
            title: Set(m.title.to_string()),
            description: Set(Some(m.description.to_string())),
            poster_url: Set(Some(m.poster_url.to_string())),
            rating: Set(Some(m.rating)),
            duration: Set(Some(m.duration)),
            release_date: Set(NaiveDate::from_ymd_opt(m.release_date.0, m.release_date.1, m.release_date.2)),
            language: Set(Some("English".to_string())),
            genres: Set(m.genres.iter().map(|g| g.to_string()).collect()),
            is_active: Set(true),
            created_at: Set(now),
        })
        .collect();

    let theaters: Vec<theater::ActiveModel> = THEATERS
        .iter()
        .zip(&theater_ids)
        .map(|((name, address, city), id)| theater::ActiveModel {
            id: Set(*id),
            name: Set(name.to_string()),
            address: Set(format!("{}, {}", address, city)),
            city: Set(city.to_string()),
            phone: Set(None),
            created_at: Set(now),
        })
        .collect();
    let showtimes = week_of_showtimes(&movie_ids, &theater_ids, today, now);
    let showtime_count = showtimes.len();

    movie::Entity::insert_many(movies).exec(db).await?;
    theater::Entity::insert_many(theaters).exec(db).await?;
    showtime::Entity::insert_many(showtimes).exec(db).await?;

    tracing::info!(
        movies = movie_ids.len(),
        theaters = theater_ids.len(),
        showtimes = showtime_count,
        "Seeded demo catalog"
    );
    Ok(true)
}

fn week_of_showtimes(
    movie_ids: &[Uuid],
    theater_ids: &[Uuid],
    today: NaiveDate,
    now: DateTimeWithTimeZone,
) -> Vec<showtime::ActiveModel> {
    let mut rng = rand::thread_rng();
    let mut showtimes = Vec::new();
    for (t, theater_id) in theater_ids.iter().enumerate() {
        for day in 0..BOOKING_WINDOW_DAYS {
            let date = today + Duration::days(day);
            for (s, (hour, minute, price)) in SLOTS.iter().enumerate() {
                let Some(time) = NaiveTime::from_hms_opt(*hour, *minute, 0) else {
                    continue;
                };
                // Rotate the line-up so each theater plays a different mix
                let movie_id = movie_ids[(t + s + day as usize) % movie_ids.len()];
                showtimes.push(showtime::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    movie_id: Set(movie_id),
                    theater_id: Set(*theater_id),
                    show_date: Set(date),
                    show_time: Set(time),
                    price: Set(Decimal::from(*price)),
                    available_seats: Set(rng.gen_range(40..=TOTAL_SEATS as i32)),
                    total_seats: Set(TOTAL_SEATS as i32),
                    created_at: Set(now),
                });
            }
        }
    }
    showtimes
}
