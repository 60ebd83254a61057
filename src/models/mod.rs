pub mod admin;
pub mod report;
pub mod user;
pub mod volunteer;

pub use admin::{Entity as Admin, Model as AdminModel};
pub use report::{Entity as Report, Model as ReportModel, ReportStatus};
pub use user::{Entity as User, Model as UserModel};
pub use volunteer::{Entity as Volunteer, Model as VolunteerModel};
