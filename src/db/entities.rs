#[allow(unused_imports)]
pub mod prelude {
    pub use super::attendance_record::Entity as AttendanceRecord;
    pub use super::incident_report::Entity as IncidentReport;
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::user::Entity as User;
}

pub mod user {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub email: String,
        pub password_hash: String,
        #[sea_orm(default_value = "")]
        pub first_name: String,
        #[sea_orm(default_value = "")]
        pub last_name: String,
        #[sea_orm(default_value = "")]
        pub phone_number: String,
        pub profile_picture: Option<String>,
        #[sea_orm(default_value = true)]
        pub is_active: bool,
        #[sea_orm(default_value = false)]
        pub is_admin: bool,
        #[sea_orm(default_value = false)]
        pub is_staff: bool,
        pub last_login_at: Option<DateTimeWithTimeZone>,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(has_many)]
        pub refresh_tokens: HasMany<super::refresh_token::Entity>,
        #[sea_orm(has_many)]
        pub attendance_records: HasMany<super::attendance_record::Entity>,
        #[sea_orm(has_many)]
        pub incident_reports: HasMany<super::incident_report::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod refresh_token {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "refresh_tokens")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub token: String,
        #[sea_orm(indexed)]
        pub user_id: Uuid,
        pub expires_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        pub revoked: bool,
        #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
        pub user: HasOne<super::user::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod attendance_record {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "attendance_records")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(indexed)]
        pub staff_id: Uuid,
        /// Server-assigned check-in instant; immutable after creation.
        pub timestamp: DateTimeWithTimeZone,
        /// The check-in's calendar day in the configured zone; key for the
        /// one-per-day rule and daily summary matching.
        #[sea_orm(indexed)]
        pub local_date: Date,
        pub latitude: f64,
        pub longitude: f64,
        pub location_note: Option<String>,
        pub note: Option<String>,
        pub selfie_photo: String,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "staff_id", to = "id", on_delete = "Cascade")]
        pub staff: HasOne<super::user::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod incident_report {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "incident_reports")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(indexed)]
        pub staff_id: Uuid,
        pub timestamp: DateTimeWithTimeZone,
        pub latitude: f64,
        pub longitude: f64,
        pub location_note: Option<String>,
        pub note: Option<String>,
        pub photo: String,
        pub status: String,
        pub priority: String,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "staff_id", to = "id", on_delete = "Cascade")]
        pub staff: HasOne<super::user::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
