//! Class session repository.

use chrono::{Utc, Weekday};
use classiq_core::session::{
    ClassSchedule, ClassSession, NewSession, SessionContext, SessionRepository,
};
use classiq_core::{Principal, Role, StoreError};
use classiq_shared::types::{ClassId, SessionId};
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::convert::{store_err, weekday_name};
use crate::entities::{class_sessions, classes, student_classes};

/// Sessions and the class schedules they belong to.
#[derive(Debug, Clone)]
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    /// Creates a new session store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SessionRepository for SessionStore {
    async fn find_class(&self, class_id: ClassId) -> Result<Option<ClassSchedule>, StoreError> {
        let class = classes::Entity::find_by_id(class_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(class.map(Into::into))
    }

    async fn classes_on(
        &self,
        principal: Principal,
        day: Weekday,
    ) -> Result<Vec<ClassSchedule>, StoreError> {
        let mut query =
            classes::Entity::find().filter(classes::Column::DayOfWeek.eq(weekday_name(day)));

        query = match principal.role {
            Role::Admin => query,
            Role::Faculty => query.filter(classes::Column::FacultyId.eq(principal.id.into_inner())),
            Role::Student => query.filter(
                classes::Column::Id.in_subquery(
                    Query::select()
                        .column(student_classes::Column::ClassId)
                        .from(student_classes::Entity)
                        .and_where(student_classes::Column::StudentId.eq(principal.id.into_inner()))
                        .to_owned(),
                ),
            ),
        };

        let rows = query.all(&self.db).await.map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_ignore(&self, session: NewSession) -> Result<ClassSession, StoreError> {
        let row = class_sessions::ActiveModel {
            id: Set(Uuid::now_v7()),
            class_id: Set(session.class_id.into_inner()),
            session_date: Set(session.session_date),
            topic: Set(session.topic),
            status: Set(session.status.into()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = class_sessions::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    class_sessions::Column::ClassId,
                    class_sessions::Column::SessionDate,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(store_err)?;

        let stored = class_sessions::Entity::find()
            .filter(class_sessions::Column::ClassId.eq(session.class_id.into_inner()))
            .filter(class_sessions::Column::SessionDate.eq(session.session_date))
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::new("session vanished after insert"))?;

        if inserted > 0 {
            tracing::info!(
                session_id = %stored.id,
                class_id = %stored.class_id,
                date = %stored.session_date,
                "class session created"
            );
        }
        Ok(stored.into())
    }

    async fn find_by_id(&self, session_id: SessionId) -> Result<Option<SessionContext>, StoreError> {
        let row = class_sessions::Entity::find_by_id(session_id.into_inner())
            .find_also_related(classes::Entity)
            .one(&self.db)
            .await
            .map_err(store_err)?;

        Ok(row.and_then(|(session, class)| {
            class.map(|class| SessionContext {
                session: session.into(),
                class: class.into(),
            })
        }))
    }
}
