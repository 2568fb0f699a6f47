use crate::{
    config::DatabaseConfig,
    domain::{page_offset, CheckIn, Coordinate, DayWindow, Gym, PAGE_SIZE},
    ports::{
        check_ins::{self, CheckInsPort},
        gyms::{self, GymsPort},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

/// PostgreSQL storage for gyms and check-ins
#[derive(Clone, Debug)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect(&config.database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[derive(sqlx::FromRow)]
struct GymRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    phone: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GymRow> for Gym {
    fn from(row: GymRow) -> Self {
        Self {
            gym_id: row.id,
            title: row.title,
            description: row.description,
            phone: row.phone,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CheckInRow {
    id: Uuid,
    user_id: Uuid,
    gym_id: Uuid,
    created_at: DateTime<Utc>,
    validated_at: Option<DateTime<Utc>>,
}

impl From<CheckInRow> for CheckIn {
    fn from(row: CheckInRow) -> Self {
        Self {
            check_in_id: row.id,
            user_id: row.user_id,
            gym_id: row.gym_id,
            created_at: row.created_at,
            validated_at: row.validated_at,
        }
    }
}

const GYM_COLUMNS: &str = "id, title, description, phone, latitude, longitude";
const CHECK_IN_COLUMNS: &str = "id, user_id, gym_id, created_at, validated_at";

#[async_trait::async_trait]
impl GymsPort for PostgresDatabase {
    async fn find_by_id(&self, gym_id: Uuid) -> Result<Option<Gym>, gyms::Error> {
        let row = sqlx::query_as::<_, GymRow>(&format!(
            "SELECT {GYM_COLUMNS} FROM gyms WHERE id = $1"
        ))
        .bind(gym_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, gym: Gym) -> Result<Gym, gyms::Error> {
        let row = sqlx::query_as::<_, GymRow>(&format!(
            "INSERT INTO gyms ({GYM_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO NOTHING RETURNING {GYM_COLUMNS}"
        ))
        .bind(gym.gym_id)
        .bind(&gym.title)
        .bind(&gym.description)
        .bind(&gym.phone)
        .bind(gym.latitude)
        .bind(gym.longitude)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or(gyms::Error::GymAlreadyExists(gym.gym_id))
    }

    async fn search_many(&self, query: String, page: u32) -> Result<Vec<Gym>, gyms::Error> {
        let rows = sqlx::query_as::<_, GymRow>(&format!(
            "SELECT {GYM_COLUMNS} FROM gyms \
             WHERE title ILIKE '%' || $1 || '%' ESCAPE '\\' \
             ORDER BY title COLLATE \"C\", id LIMIT $2 OFFSET $3"
        ))
        .bind(escape_like(&query))
        .bind(PAGE_SIZE as i64)
        .bind(page_offset(page) as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_many_nearby(
        &self,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Gym>, gyms::Error> {
        // Same spherical law of cosines as `Coordinate::distance_to`
        let rows = sqlx::query_as::<_, GymRow>(&format!(
            "SELECT {GYM_COLUMNS} FROM gyms \
             WHERE 6371 * acos(LEAST(1.0, GREATEST(-1.0, \
                 sin(radians($1)) * sin(radians(latitude)) \
                 + cos(radians($1)) * cos(radians(latitude)) * cos(radians($2 - longitude))\
             ))) <= $3"
        ))
        .bind(origin.latitude)
        .bind(origin.longitude)
        .bind(radius_km)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait::async_trait]
impl CheckInsPort for PostgresDatabase {
    async fn find_by_id(&self, check_in_id: Uuid) -> Result<Option<CheckIn>, check_ins::Error> {
        let row = sqlx::query_as::<_, CheckInRow>(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM check_ins WHERE id = $1"
        ))
        .bind(check_in_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_user_id_on_date(
        &self,
        user_id: Uuid,
        day: DayWindow,
    ) -> Result<Option<CheckIn>, check_ins::Error> {
        let row = sqlx::query_as::<_, CheckInRow>(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM check_ins \
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3 \
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(day.start)
        .bind(day.end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_many_by_user_id(
        &self,
        user_id: Uuid,
        page: u32,
    ) -> Result<Vec<CheckIn>, check_ins::Error> {
        let rows = sqlx::query_as::<_, CheckInRow>(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM check_ins \
             WHERE user_id = $1 \
             ORDER BY created_at, id LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(PAGE_SIZE as i64)
        .bind(page_offset(page) as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_user_id(&self, user_id: Uuid) -> Result<u64, check_ins::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM check_ins WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn create(&self, check_in: CheckIn) -> Result<CheckIn, check_ins::Error> {
        let row = sqlx::query_as::<_, CheckInRow>(&format!(
            "INSERT INTO check_ins ({CHECK_IN_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO NOTHING RETURNING {CHECK_IN_COLUMNS}"
        ))
        .bind(check_in.check_in_id)
        .bind(check_in.user_id)
        .bind(check_in.gym_id)
        .bind(check_in.created_at)
        .bind(check_in.validated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or(check_ins::Error::CheckInAlreadyExists(check_in.check_in_id))
    }

    async fn save(&self, check_in: CheckIn) -> Result<CheckIn, check_ins::Error> {
        let row = sqlx::query_as::<_, CheckInRow>(&format!(
            "UPDATE check_ins SET user_id = $2, gym_id = $3, created_at = $4, validated_at = $5 \
             WHERE id = $1 RETURNING {CHECK_IN_COLUMNS}"
        ))
        .bind(check_in.check_in_id)
        .bind(check_in.user_id)
        .bind(check_in.gym_id)
        .bind(check_in.created_at)
        .bind(check_in.validated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or(check_ins::Error::CheckInDoesNotExist(check_in.check_in_id))
    }
}

/// Escape `LIKE` metacharacters so the pattern matches `query` literally
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl From<sqlx::Error> for gyms::Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}

impl From<sqlx::Error> for check_ins::Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}
