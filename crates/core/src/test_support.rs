//! In-memory stores for service tests.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use classiq_shared::types::{
    ClassId, EmbeddingId, QrTokenId, RecordId, SessionId, UserId, WindowId,
};

use crate::attendance::{
    AttendanceMark, AttendanceRecord, AttendanceRepository, BulkEntry, MarkedBy, RequestMeta,
};
use crate::auth::{Principal, Role};
use crate::enrollment::EnrollmentDirectory;
use crate::face::{
    EmbeddingRepository, FaceEmbedding, NewEmbedding, NewScanLog, ScanLogRepository,
};
use crate::qr::{NewQrToken, QrToken, QrTokenRepository};
use crate::session::{
    ClassSchedule, ClassSession, NewSession, SessionContext, SessionRepository, SessionStatus,
};
use crate::store::{StoreError, Stores};
use crate::window::{AttendanceWindow, NewWindow, WindowMethod, WindowRepository};

#[derive(Default)]
struct State {
    classes: HashMap<ClassId, ClassSchedule>,
    sessions: Vec<ClassSession>,
    enrollments: HashSet<(ClassId, UserId)>,
    windows: Vec<AttendanceWindow>,
    tokens: Vec<QrToken>,
    embeddings: Vec<FaceEmbedding>,
    scan_logs: Vec<NewScanLog>,
    records: HashMap<(SessionId, UserId), AttendanceRecord>,
    fail_record_writes: bool,
}

/// Every repository backed by one mutex-guarded state.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn add_class(&self, faculty_id: UserId, start: NaiveTime, end: NaiveTime) -> ClassSchedule {
        let class = ClassSchedule {
            id: ClassId::new(),
            faculty_id,
            name: "Operating Systems".to_string(),
            day_of_week: Some(Weekday::Tue),
            start_time: Some(start),
            end_time: Some(end),
        };
        self.state
            .lock()
            .unwrap()
            .classes
            .insert(class.id, class.clone());
        class
    }

    pub fn add_session(&self, class_id: ClassId, date: NaiveDate) -> ClassSession {
        let session = ClassSession {
            id: SessionId::new(),
            class_id,
            session_date: date,
            topic: None,
            status: SessionStatus::Scheduled,
        };
        self.state.lock().unwrap().sessions.push(session.clone());
        session
    }

    pub fn enroll(&self, class_id: ClassId, student_id: UserId) {
        self.state
            .lock()
            .unwrap()
            .enrollments
            .insert((class_id, student_id));
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    pub fn windows_for(&self, session_id: SessionId) -> Vec<AttendanceWindow> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .filter(|w| w.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn tokens_for(&self, session_id: SessionId) -> Vec<QrToken> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn scan_logs(&self) -> Vec<NewScanLog> {
        self.state.lock().unwrap().scan_logs.clone()
    }

    pub fn record(&self, session_id: SessionId, student_id: UserId) -> Option<AttendanceRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(&(session_id, student_id))
            .cloned()
    }

    /// Makes every later single-record upsert fail.
    pub fn fail_record_writes(&self) {
        self.state.lock().unwrap().fail_record_writes = true;
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn embedding_count(&self, user_id: UserId) -> usize {
        self.state
            .lock()
            .unwrap()
            .embeddings
            .iter()
            .filter(|e| e.user_id == user_id)
            .count()
    }

    pub fn embeddings_of(&self, user_id: UserId) -> Vec<FaceEmbedding> {
        self.state
            .lock()
            .unwrap()
            .embeddings
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl SessionRepository for MemoryStore {
    async fn find_class(&self, class_id: ClassId) -> Result<Option<ClassSchedule>, StoreError> {
        Ok(self.state.lock().unwrap().classes.get(&class_id).cloned())
    }

    async fn classes_on(
        &self,
        principal: Principal,
        day: Weekday,
    ) -> Result<Vec<ClassSchedule>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .classes
            .values()
            .filter(|c| c.day_of_week == Some(day))
            .filter(|c| match principal.role {
                Role::Admin => true,
                Role::Faculty => c.faculty_id == principal.id,
                Role::Student => state.enrollments.contains(&(c.id, principal.id)),
            })
            .cloned()
            .collect())
    }

    async fn insert_ignore(&self, new: NewSession) -> Result<ClassSession, StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .sessions
            .iter()
            .find(|s| s.class_id == new.class_id && s.session_date == new.session_date)
        {
            return Ok(existing.clone());
        }
        let session = ClassSession {
            id: SessionId::new(),
            class_id: new.class_id,
            session_date: new.session_date,
            topic: new.topic,
            status: new.status,
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, session_id: SessionId) -> Result<Option<SessionContext>, StoreError> {
        let state = self.state.lock().unwrap();
        let Some(session) = state.sessions.iter().find(|s| s.id == session_id) else {
            return Ok(None);
        };
        Ok(state.classes.get(&session.class_id).map(|class| SessionContext {
            session: session.clone(),
            class: class.clone(),
        }))
    }
}

impl EnrollmentDirectory for MemoryStore {
    async fn is_enrolled(&self, class_id: ClassId, student_id: UserId) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .enrollments
            .contains(&(class_id, student_id)))
    }

    async fn count_enrolled(&self, class_id: ClassId) -> Result<u64, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.enrollments.iter().filter(|(c, _)| *c == class_id).count() as u64)
    }
}

impl WindowRepository for MemoryStore {
    async fn replace_active(&self, new: NewWindow) -> Result<AttendanceWindow, StoreError> {
        let mut state = self.state.lock().unwrap();
        for w in state
            .windows
            .iter_mut()
            .filter(|w| w.session_id == new.session_id && w.is_active)
        {
            w.is_active = false;
        }
        let window = AttendanceWindow {
            id: WindowId::new(),
            session_id: new.session_id,
            opened_by: new.opened_by,
            method: new.method,
            opens_at: new.opens_at,
            closes_at: new.closes_at,
            is_active: true,
            allowed_network: new.allowed_network,
        };
        state.windows.push(window.clone());
        Ok(window)
    }

    async fn close_active(
        &self,
        session_id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<Option<AttendanceWindow>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let window = state
            .windows
            .iter_mut()
            .find(|w| w.session_id == session_id && w.is_active);
        Ok(window.map(|w| {
            w.is_active = false;
            w.closes_at = Some(at);
            w.clone()
        }))
    }

    async fn find_active(&self, session_id: SessionId) -> Result<Option<AttendanceWindow>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.session_id == session_id && w.is_active)
            .cloned())
    }
}

impl QrTokenRepository for MemoryStore {
    async fn replace_for_session(&self, new: NewQrToken) -> Result<QrToken, StoreError> {
        let mut state = self.state.lock().unwrap();
        for t in state
            .tokens
            .iter_mut()
            .filter(|t| t.session_id == new.session_id)
        {
            t.is_active = false;
        }
        let token = QrToken {
            id: QrTokenId::new(),
            session_id: new.session_id,
            token: new.token,
            expires_at: new.expires_at,
            is_active: true,
        };
        state.tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<QrToken>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tokens
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn deactivate(&self, id: QrTokenId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(t) = state.tokens.iter_mut().find(|t| t.id == id) {
            t.is_active = false;
        }
        Ok(())
    }

    async fn find_active_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<QrToken>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tokens
            .iter()
            .find(|t| t.session_id == session_id && t.is_active)
            .cloned())
    }
}

impl EmbeddingRepository for MemoryStore {
    async fn replace_all(
        &self,
        user_id: UserId,
        embeddings: Vec<NewEmbedding>,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.embeddings.retain(|e| e.user_id != user_id);
        let count = embeddings.len() as u64;
        state
            .embeddings
            .extend(embeddings.into_iter().map(|e| FaceEmbedding {
                id: EmbeddingId::new(),
                user_id,
                descriptor: e.descriptor,
                label: e.label,
                is_primary: e.is_primary,
            }));
        Ok(count)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FaceEmbedding>, StoreError> {
        Ok(self.embeddings_of(user_id))
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<u64, StoreError> {
        Ok(self.embedding_count(user_id) as u64)
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.embeddings.len();
        state.embeddings.retain(|e| e.user_id != user_id);
        Ok((before - state.embeddings.len()) as u64)
    }
}

impl ScanLogRepository for MemoryStore {
    async fn append(&self, entry: NewScanLog) -> Result<(), StoreError> {
        self.state.lock().unwrap().scan_logs.push(entry);
        Ok(())
    }
}

impl AttendanceRepository for MemoryStore {
    async fn upsert(&self, mark: AttendanceMark) -> Result<AttendanceRecord, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_record_writes {
            return Err(StoreError::new("attendance_records unavailable"));
        }
        let key = (mark.session_id, mark.student_id);
        let id = state.records.get(&key).map_or_else(RecordId::new, |r| r.id);
        let record = AttendanceRecord {
            id,
            session_id: mark.session_id,
            student_id: mark.student_id,
            status: mark.status,
            marked_by: mark.marked_by,
            marked_at: mark.marked_at,
            meta: mark.meta,
        };
        state.records.insert(key, record.clone());
        Ok(record)
    }

    async fn upsert_bulk(
        &self,
        session_id: SessionId,
        entries: Vec<BulkEntry>,
        marked_by: MarkedBy,
        marked_at: DateTime<Utc>,
        meta: RequestMeta,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let mut changed = 0;
        for entry in entries {
            match state.records.entry((session_id, entry.student_id)) {
                Entry::Occupied(mut occupied) => {
                    let existing = occupied.get_mut();
                    if existing.status != entry.status {
                        existing.status = entry.status;
                        existing.marked_by = marked_by;
                        existing.marked_at = marked_at;
                        existing.meta = meta.clone();
                        changed += 1;
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(AttendanceRecord {
                        id: RecordId::new(),
                        session_id,
                        student_id: entry.student_id,
                        status: entry.status,
                        marked_by,
                        marked_at,
                        meta: meta.clone(),
                    });
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn count_for_session(&self, session_id: SessionId) -> Result<u64, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.records.keys().filter(|(s, _)| *s == session_id).count() as u64)
    }

    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<AttendanceRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }
}

impl Stores for MemoryStore {
    type Sessions = Self;
    type Enrollment = Self;
    type Windows = Self;
    type Tokens = Self;
    type Embeddings = Self;
    type ScanLogs = Self;
    type Records = Self;

    fn sessions(&self) -> &Self {
        self
    }
    fn enrollment(&self) -> &Self {
        self
    }
    fn windows(&self) -> &Self {
        self
    }
    fn tokens(&self) -> &Self {
        self
    }
    fn embeddings(&self) -> &Self {
        self
    }
    fn scan_logs(&self) -> &Self {
        self
    }
    fn records(&self) -> &Self {
        self
    }
}

pub fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Tuesday 2026-03-10, 09:30 IST.
pub fn class_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 4, 0, 0).unwrap()
}

/// One class taught by `faculty` with `student` enrolled and today's
/// session created.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub faculty: Principal,
    pub student: Principal,
    pub admin: Principal,
    pub class: ClassSchedule,
    pub session: ClassSession,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let faculty = Principal::new(UserId::new(), Role::Faculty);
        let student = Principal::new(UserId::new(), Role::Student);
        let admin = Principal::new(UserId::new(), Role::Admin);
        let class = store.add_class(faculty.id, t(9, 0), t(10, 0));
        store.enroll(class.id, student.id);
        let session = store.add_session(class.id, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        Self {
            store,
            faculty,
            student,
            admin,
            class,
            session,
        }
    }

    /// Opens a window directly in the store.
    pub fn open_window(
        &self,
        method: WindowMethod,
        minutes: Option<i64>,
        allowed_network: Option<&str>,
    ) -> AttendanceWindow {
        let now = class_time();
        let mut state = self.store.state.lock().unwrap();
        let window = AttendanceWindow {
            id: WindowId::new(),
            session_id: self.session.id,
            opened_by: self.faculty.id,
            method,
            opens_at: now,
            closes_at: minutes.map(|m| now + Duration::minutes(m)),
            is_active: true,
            allowed_network: allowed_network.map(str::to_string),
        };
        state.windows.push(window.clone());
        window
    }

    pub fn other_student(&self) -> Principal {
        Principal::new(UserId::new(), Role::Student)
    }
}
