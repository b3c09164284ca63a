//! PostgreSQL storage implementations
//!
//! Hotels keep their embedded shape: facilities, image URLs and bookings
//! live in `jsonb` columns. Search composes a bound-parameter WHERE
//! clause from the typed filters; untrusted input is never spliced into
//! SQL text.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{
    BookingAppend, CatalogStore, CredentialStore, SearchPage, StoreError, StoreResult,
};
use crate::models::{Booking, Hotel, User};
use crate::search::{PAGE_SIZE, SearchFilters, SortOption};

const HOTEL_COLUMNS: &str = "id, owner_id, name, city, country, description, hotel_type, \
     price_per_night, star_rating, adult_count, child_count, facilities, image_urls, \
     last_updated, bookings";

/// Create the tables if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hotels (
            id UUID PRIMARY KEY,
            owner_id UUID NOT NULL,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            country TEXT NOT NULL,
            description TEXT NOT NULL,
            hotel_type TEXT NOT NULL,
            price_per_night BIGINT NOT NULL CHECK (price_per_night >= 0),
            star_rating INT NOT NULL,
            adult_count INT NOT NULL CHECK (adult_count >= 0),
            child_count INT NOT NULL CHECK (child_count >= 0),
            facilities JSONB NOT NULL DEFAULT '[]'::jsonb,
            image_urls JSONB NOT NULL DEFAULT '[]'::jsonb,
            last_updated TIMESTAMPTZ NOT NULL,
            bookings JSONB NOT NULL DEFAULT '[]'::jsonb
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// PostgreSQL credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: PgRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
    })
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            other => StoreError::Database(other),
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }
}

/// PostgreSQL catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn hotel_from_row(row: PgRow) -> StoreResult<Hotel> {
    let facilities: Json<Vec<String>> = row.try_get("facilities")?;
    let image_urls: Json<Vec<String>> = row.try_get("image_urls")?;
    let bookings: Json<Vec<Booking>> = row.try_get("bookings")?;

    Ok(Hotel {
        id: row.try_get("id")?,
        user_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        country: row.try_get("country")?,
        description: row.try_get("description")?,
        hotel_type: row.try_get("hotel_type")?,
        price_per_night: row.try_get("price_per_night")?,
        star_rating: row.try_get("star_rating")?,
        adult_count: row.try_get("adult_count")?,
        child_count: row.try_get("child_count")?,
        facilities: facilities.0,
        image_urls: image_urls.0,
        last_updated: row.try_get("last_updated")?,
        bookings: bookings.0,
    })
}

/// Append the WHERE clause for the given filters, binding every value
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SearchFilters) {
    qb.push(" WHERE TRUE");

    if let Some(destination) = &filters.destination {
        let pattern = format!("%{}%", destination);
        qb.push(" AND (city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR country ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(min_adults) = filters.min_adults {
        qb.push(" AND adult_count >= ").push_bind(min_adults);
    }

    if let Some(min_children) = filters.min_children {
        qb.push(" AND child_count >= ").push_bind(min_children);
    }

    if !filters.facilities.is_empty() {
        qb.push(" AND facilities @> ")
            .push_bind(Json(filters.facilities.clone()));
    }

    if !filters.types.is_empty() {
        qb.push(" AND hotel_type = ANY(")
            .push_bind(filters.types.clone())
            .push(")");
    }

    if !filters.stars.is_empty() {
        qb.push(" AND star_rating = ANY(")
            .push_bind(filters.stars.clone())
            .push(")");
    }

    if let Some(max_price) = filters.max_price {
        qb.push(" AND price_per_night <= ").push_bind(max_price);
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, sort: SortOption) {
    match sort {
        SortOption::Unsorted => {}
        SortOption::StarRating => {
            qb.push(" ORDER BY star_rating DESC");
        }
        SortOption::PricePerNightAsc => {
            qb.push(" ORDER BY price_per_night ASC");
        }
        SortOption::PricePerNightDesc => {
            qb.push(" ORDER BY price_per_night DESC");
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn insert_hotel(&self, hotel: Hotel) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO hotels (id, owner_id, name, city, country, description, hotel_type,
                                price_per_night, star_rating, adult_count, child_count,
                                facilities, image_urls, last_updated, bookings)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(hotel.id)
        .bind(hotel.user_id)
        .bind(&hotel.name)
        .bind(&hotel.city)
        .bind(&hotel.country)
        .bind(&hotel.description)
        .bind(&hotel.hotel_type)
        .bind(hotel.price_per_night)
        .bind(hotel.star_rating)
        .bind(hotel.adult_count)
        .bind(hotel.child_count)
        .bind(Json(&hotel.facilities))
        .bind(Json(&hotel.image_urls))
        .bind(hotel.last_updated)
        .bind(Json(&hotel.bookings))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn hotel_by_id(&self, id: Uuid) -> StoreResult<Option<Hotel>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM hotels WHERE id = $1",
            HOTEL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(hotel_from_row).transpose()
    }

    async fn hotels_owned_by(&self, owner_id: Uuid) -> StoreResult<Vec<Hotel>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM hotels WHERE owner_id = $1",
            HOTEL_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(hotel_from_row).collect()
    }

    async fn owned_hotel(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Hotel>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM hotels WHERE id = $1 AND owner_id = $2",
            HOTEL_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(hotel_from_row).transpose()
    }

    async fn update_owned_hotel(&self, hotel: Hotel) -> StoreResult<Option<Hotel>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE hotels
            SET name = $3, city = $4, country = $5, description = $6, hotel_type = $7,
                price_per_night = $8, star_rating = $9, adult_count = $10, child_count = $11,
                facilities = $12, image_urls = $13, last_updated = $14
            WHERE id = $1 AND owner_id = $2
            RETURNING {}
            "#,
            HOTEL_COLUMNS
        ))
        .bind(hotel.id)
        .bind(hotel.user_id)
        .bind(&hotel.name)
        .bind(&hotel.city)
        .bind(&hotel.country)
        .bind(&hotel.description)
        .bind(&hotel.hotel_type)
        .bind(hotel.price_per_night)
        .bind(hotel.star_rating)
        .bind(hotel.adult_count)
        .bind(hotel.child_count)
        .bind(Json(&hotel.facilities))
        .bind(Json(&hotel.image_urls))
        .bind(hotel.last_updated)
        .fetch_optional(&self.pool)
        .await?;

        row.map(hotel_from_row).transpose()
    }

    async fn search(
        &self,
        filters: &SearchFilters,
        sort: SortOption,
        page: u32,
    ) -> StoreResult<SearchPage> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM hotels");
        push_filters(&mut count_query, filters);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::new(format!("SELECT {} FROM hotels", HOTEL_COLUMNS));
        push_filters(&mut query, filters);
        push_order(&mut query, sort);

        let offset = i64::from(page.saturating_sub(1)) * i64::from(PAGE_SIZE);
        query
            .push(" LIMIT ")
            .push_bind(i64::from(PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = query.build().fetch_all(&self.pool).await?;
        let hotels = rows
            .into_iter()
            .map(hotel_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(SearchPage {
            hotels,
            total: total.max(0) as u64,
        })
    }

    async fn append_booking(&self, hotel_id: Uuid, booking: Booking) -> StoreResult<BookingAppend> {
        // One conditional UPDATE: the duplicate check and the append are
        // atomic at the row level, closing the double-booking race
        let result = sqlx::query(
            r#"
            UPDATE hotels
            SET bookings = bookings || $2::jsonb
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM jsonb_array_elements(bookings) AS existing
                  WHERE existing->>'paymentIntentId' = $3
              )
            "#,
        )
        .bind(hotel_id)
        .bind(Json(&booking))
        .bind(&booking.payment_intent_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(BookingAppend::Appended);
        }

        let exists = sqlx::query("SELECT 1 FROM hotels WHERE id = $1")
            .bind(hotel_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_some() {
            Ok(BookingAppend::AlreadyRecorded)
        } else {
            Ok(BookingAppend::HotelMissing)
        }
    }

    async fn hotels_booked_by(&self, user_id: Uuid) -> StoreResult<Vec<Hotel>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM hotels
            WHERE EXISTS (
                SELECT 1
                FROM jsonb_array_elements(bookings) AS booking
                WHERE booking->>'userId' = $1
            )
            "#,
            HOTEL_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut hotels = rows
            .into_iter()
            .map(hotel_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        for hotel in &mut hotels {
            hotel.bookings.retain(|b| b.user_id == user_id);
        }

        Ok(hotels)
    }
}
