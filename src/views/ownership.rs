use crate::models::instructors::Principal;
use crate::models::{Entity, Ownership};

/// 当前讲师能否编辑/删除该记录
///
/// 无归属的记录任何人都可以管理；有归属的记录只有所属讲师可以管理，
/// 仅有 token 而没有讲师信息时视为无权限。
pub fn can_manage<E: Entity>(principal: Option<&Principal>, record: &E) -> bool {
    match E::OWNERSHIP {
        Ownership::Unowned => true,
        Ownership::ByInstructor => match (principal, record.owner_id()) {
            (Some(principal), Some(owner)) => principal.instructor_id == owner,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::Course;
    use crate::models::instructors::Instructor;
    use crate::models::students::Student;

    fn principal(id: i64) -> Principal {
        Principal {
            instructor_id: id,
            ..Default::default()
        }
    }

    #[test]
    fn test_course_ownership() {
        let course = Course {
            course_id: 1,
            instructor_id: Some(5),
            ..Default::default()
        };
        assert!(can_manage(Some(&principal(5)), &course));
        assert!(!can_manage(Some(&principal(6)), &course));
        assert!(!can_manage(None, &course));

        let orphan = Course::default();
        assert!(!can_manage(Some(&principal(5)), &orphan));
    }

    #[test]
    fn test_instructor_can_only_manage_self() {
        let me = Instructor {
            instructor_id: 5,
            ..Default::default()
        };
        assert!(can_manage(Some(&principal(5)), &me));
        assert!(!can_manage(Some(&principal(7)), &me));
    }

    #[test]
    fn test_students_have_no_owner() {
        assert!(can_manage(None, &Student::default()));
    }
}
