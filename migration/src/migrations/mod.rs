pub mod m202602090001_create_roles;
pub mod m202602090002_create_users;
pub mod m202602090003_create_work_shifts;
pub mod m202602090004_create_leave_records;
pub mod m202602090005_create_lateness_cases;
