use std::io::Write;

use rideline_core::roles::Role;
use rideline_services::auth::{LoginRequest, RegisterRequest};

use super::{App, CliError};
use crate::args::RegisterArgs;

pub(super) async fn login(
    app: &App,
    email: String,
    password: String,
    role: Role,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password,
        role,
    };
    let role = app.services.auth.login(&request).await?;
    app.session.set_role(role)?;

    writeln!(out, "Logged in as {role} ({})", role.home_path())?;
    Ok(())
}

pub(super) async fn register(app: &App, args: RegisterArgs, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let request = RegisterRequest {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        password: args.password,
        role: args.role,
        phone: args.phone.trim().to_string(),
    };
    app.services.auth.register(&request).await?;

    writeln!(out, "Registered {} as {}. You can now log in.", request.email, request.role)?;
    Ok(())
}
