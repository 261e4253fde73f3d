// Sat Jan 24 2026 - Alex

use crate::engine::AnalysisSession;
use crate::heap::{HeapObject, ObjectRef};
use crate::structure::{FieldDescriptor, ObjectShape};
use log::warn;

pub const STATE_MACHINE_FIELD: &str = "StateMachine";
pub const INNER_TASK_FIELD: &str = "m_task";
pub const ACTION_FIELD: &str = "m_action";
pub const TARGET_FIELD: &str = "_target";
pub const WRAPPED_CONTINUATION_FIELD: &str = "_continuation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnwrapRule {
    Accept,
    Follow,
}

/// Tried in order; the first field present on the object decides.
const UNWRAP_RULES: &[(&str, UnwrapRule)] = &[
    (STATE_MACHINE_FIELD, UnwrapRule::Accept),
    (INNER_TASK_FIELD, UnwrapRule::Follow),
];

pub struct FieldReader<'a> {
    session: &'a AnalysisSession,
}

impl<'a> FieldReader<'a> {
    pub fn new(session: &'a AnalysisSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &'a AnalysisSession {
        self.session
    }

    pub fn field(&self, object: &HeapObject, name: &str) -> Option<FieldDescriptor> {
        let ty = object.type_of(self.session).ok()?;
        self.session.resolver().find_field(&ty, name)
    }

    pub fn shape(&self, object: &HeapObject) -> ObjectShape {
        match object.type_of(self.session) {
            Ok(ty) => self.session.resolver().shape_of(&ty),
            Err(_) => ObjectShape::Other,
        }
    }

    pub fn follow(&self, object: &HeapObject, field: &FieldDescriptor) -> Option<ObjectRef> {
        match self.session.read_object_field(object, field) {
            Ok(target) => target,
            Err(e) => {
                warn!(
                    "Cannot read {} of object at {:X}: {}",
                    field.name(),
                    object.address(),
                    e
                );
                None
            }
        }
    }

    pub fn follow_named(&self, object: &HeapObject, name: &str) -> Option<ObjectRef> {
        let field = self.field(object, name)?;
        self.follow(object, &field)
    }
}

/// Maps a raw continuation reference to the async object it stands for.
pub struct ContinuationUnwrapper<'a> {
    reader: FieldReader<'a>,
}

impl<'a> ContinuationUnwrapper<'a> {
    pub fn new(session: &'a AnalysisSession) -> Self {
        Self {
            reader: FieldReader::new(session),
        }
    }

    pub fn resolve(&self, object: ObjectRef) -> ObjectRef {
        for (field_name, rule) in UNWRAP_RULES {
            let Some(field) = self.reader.field(&object, field_name) else {
                continue;
            };
            return match rule {
                UnwrapRule::Accept => object,
                UnwrapRule::Follow => self.reader.follow(&object, &field).unwrap_or(object),
            };
        }
        self.resolve_delegate(object)
    }

    /// Delegate continuations: action, then closure target, then wrapper payload.
    fn resolve_delegate(&self, object: ObjectRef) -> ObjectRef {
        let mut current = self
            .reader
            .follow_named(&object, ACTION_FIELD)
            .unwrap_or(object);

        if let Some(target) = self.reader.follow_named(&current, TARGET_FIELD) {
            current = target;
            if self.reader.shape(&current) == ObjectShape::ContinuationWrapper {
                if let Some(inner) = self.reader.follow_named(&current, WRAPPED_CONTINUATION_FIELD) {
                    current = inner;
                }
            }
        }
        current
    }
}
