//! Database queries
//!
//! All SQL lives here; handlers call these functions with the pool from
//! [`crate::state::AppState`] and map the results. Functions return plain
//! `sqlx::Error` so callers can decide what a failure means (the register
//! handler, for one, treats a unique violation as user input, not a 500).

use chrono::Utc;
use sqlx::SqlitePool;

use opine_core::model::{
    Business, BusinessSummary, NewBusiness, NewReview, NewUser, Review, ReviewWithAuthor, User,
};

// ============================================================================
// Users
// ============================================================================

pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Whether an error is a UNIQUE constraint violation (e.g. a taken
/// username or a second review row for the same pair).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

// ============================================================================
// Businesses
// ============================================================================

pub async fn insert_business(
    pool: &SqlitePool,
    business: &NewBusiness,
) -> Result<Business, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO businesses (name, owner_id, created_at)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&business.name)
    .bind(business.owner_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get_business(pool: &SqlitePool, id: i64) -> Result<Option<Business>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM businesses WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All businesses with owner name and review count, newest first.
pub async fn list_businesses(pool: &SqlitePool) -> Result<Vec<BusinessSummary>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            b.id,
            b.name,
            b.owner_id,
            u.username AS owner_name,
            COUNT(r.id) AS review_count,
            b.created_at
        FROM businesses b
        JOIN users u ON u.id = b.owner_id
        LEFT JOIN reviews r ON r.business_id = b.id
        GROUP BY b.id
        ORDER BY b.created_at DESC, b.id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

// ============================================================================
// Reviews
// ============================================================================

/// Insert or overwrite the caller's review for a business.
///
/// The `(user_id, business_id)` unique key turns a resubmission into an
/// update of the existing row; `created_at` keeps its original value.
pub async fn upsert_review(pool: &SqlitePool, review: &NewReview) -> Result<Review, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as(
        r#"
        INSERT INTO reviews (
            user_id, business_id,
            rating_place, rating_price, rating_installations, rating_service,
            location, comment, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, business_id) DO UPDATE SET
            rating_place = excluded.rating_place,
            rating_price = excluded.rating_price,
            rating_installations = excluded.rating_installations,
            rating_service = excluded.rating_service,
            location = excluded.location,
            comment = excluded.comment,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(review.user_id)
    .bind(review.business_id)
    .bind(i64::from(review.place.get()))
    .bind(i64::from(review.price.get()))
    .bind(i64::from(review.installations.get()))
    .bind(i64::from(review.service.get()))
    .bind(review.location.as_str())
    .bind(&review.comment)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// All reviews for a business, most recently updated first.
pub async fn list_reviews(pool: &SqlitePool, business_id: i64) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE business_id = ? ORDER BY updated_at DESC, id DESC")
        .bind(business_id)
        .fetch_all(pool)
        .await
}

/// Reviews for a business joined with each author's username.
pub async fn list_reviews_with_authors(
    pool: &SqlitePool,
    business_id: i64,
) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            r.id,
            r.user_id,
            u.username AS author,
            r.business_id,
            r.rating_place,
            r.rating_price,
            r.rating_installations,
            r.rating_service,
            r.location,
            r.comment,
            r.updated_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.business_id = ?
        ORDER BY r.updated_at DESC, r.id DESC
        "#,
    )
    .bind(business_id)
    .fetch_all(pool)
    .await
}

/// One user's review of one business, if they have submitted one.
pub async fn find_review(
    pool: &SqlitePool,
    user_id: i64,
    business_id: i64,
) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE user_id = ? AND business_id = ?")
        .bind(user_id)
        .bind(business_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use opine_core::model::RawReview;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::migrations::run(&pool).await.unwrap();
        pool
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: format!("$argon2id$test${}", username),
        }
    }

    fn review_payload(user_id: i64, business_id: i64, place: i64) -> NewReview {
        NewReview::validated(
            user_id,
            business_id,
            &RawReview {
                place,
                price: 6,
                installations: 7,
                service: 8,
                location: "convenient".into(),
                comment: "fine".into(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_fetch_user() {
        let pool = test_pool().await;

        let user = insert_user(&pool, &new_user("karla")).await.unwrap();
        assert_eq!(user.username, "karla");

        let by_name = get_user_by_username(&pool, "karla").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_id = get_user_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "karla");

        assert!(get_user_by_username(&pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_unique_violation() {
        let pool = test_pool().await;

        insert_user(&pool, &new_user("karla")).await.unwrap();
        let err = insert_user(&pool, &new_user("karla")).await.unwrap_err();

        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn business_listing_carries_owner_and_counts() {
        let pool = test_pool().await;

        let owner = insert_user(&pool, &new_user("owner")).await.unwrap();
        let reviewer = insert_user(&pool, &new_user("reviewer")).await.unwrap();
        let business = insert_business(
            &pool,
            &NewBusiness {
                name: "Cafe Rio".into(),
                owner_id: owner.id,
            },
        )
        .await
        .unwrap();

        upsert_review(&pool, &review_payload(reviewer.id, business.id, 9))
            .await
            .unwrap();

        let listing = list_businesses(&pool).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "Cafe Rio");
        assert_eq!(listing[0].owner_name, "owner");
        assert_eq!(listing[0].review_count, 1);
    }

    #[tokio::test]
    async fn get_business_missing_is_none() {
        let pool = test_pool().await;
        assert!(get_business(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resubmitting_a_review_overwrites_it() {
        let pool = test_pool().await;

        let owner = insert_user(&pool, &new_user("owner")).await.unwrap();
        let reviewer = insert_user(&pool, &new_user("reviewer")).await.unwrap();
        let business = insert_business(
            &pool,
            &NewBusiness {
                name: "Cafe Rio".into(),
                owner_id: owner.id,
            },
        )
        .await
        .unwrap();

        let first = upsert_review(&pool, &review_payload(reviewer.id, business.id, 2))
            .await
            .unwrap();
        let second = upsert_review(&pool, &review_payload(reviewer.id, business.id, 10))
            .await
            .unwrap();

        // Same row, updated values
        assert_eq!(first.id, second.id);
        assert_eq!(second.rating_place, 10);

        let all = list_reviews(&pool, business.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].rating_place, 10);
    }

    #[tokio::test]
    async fn distinct_users_get_distinct_rows() {
        let pool = test_pool().await;

        let owner = insert_user(&pool, &new_user("owner")).await.unwrap();
        let first = insert_user(&pool, &new_user("first")).await.unwrap();
        let second = insert_user(&pool, &new_user("second")).await.unwrap();
        let business = insert_business(
            &pool,
            &NewBusiness {
                name: "Cafe Rio".into(),
                owner_id: owner.id,
            },
        )
        .await
        .unwrap();

        upsert_review(&pool, &review_payload(first.id, business.id, 3))
            .await
            .unwrap();
        upsert_review(&pool, &review_payload(second.id, business.id, 4))
            .await
            .unwrap();

        assert_eq!(list_reviews(&pool, business.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reviews_join_their_authors() {
        let pool = test_pool().await;

        let owner = insert_user(&pool, &new_user("owner")).await.unwrap();
        let reviewer = insert_user(&pool, &new_user("reviewer")).await.unwrap();
        let business = insert_business(
            &pool,
            &NewBusiness {
                name: "Cafe Rio".into(),
                owner_id: owner.id,
            },
        )
        .await
        .unwrap();

        upsert_review(&pool, &review_payload(reviewer.id, business.id, 5))
            .await
            .unwrap();

        let reviews = list_reviews_with_authors(&pool, business.id).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].author, "reviewer");
        assert_eq!(reviews[0].rating_place, 5);
    }

    #[tokio::test]
    async fn find_review_is_scoped_to_the_pair() {
        let pool = test_pool().await;

        let owner = insert_user(&pool, &new_user("owner")).await.unwrap();
        let reviewer = insert_user(&pool, &new_user("reviewer")).await.unwrap();
        let business = insert_business(
            &pool,
            &NewBusiness {
                name: "Cafe Rio".into(),
                owner_id: owner.id,
            },
        )
        .await
        .unwrap();

        upsert_review(&pool, &review_payload(reviewer.id, business.id, 5))
            .await
            .unwrap();

        assert!(find_review(&pool, reviewer.id, business.id)
            .await
            .unwrap()
            .is_some());
        assert!(find_review(&pool, owner.id, business.id)
            .await
            .unwrap()
            .is_none());
    }
}
