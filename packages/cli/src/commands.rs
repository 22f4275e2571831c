use anyhow::{anyhow, bail, Result};
use api::models::notification::unread_count;
use api::models::{
    Appointment, Country, Department, Mission, Notification, PasswordChange, ProfileUpdate,
};
use api::{Id, ReqwestTransport};
use app::{AppContext, AppError, LoadState, NavigationShell, Resource, Screen};
use store::FileStore;

type Ctx = AppContext<ReqwestTransport, FileStore>;

/// Optional overrides for `update-profile`.
pub struct ProfileEdits {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn status(ctx: &Ctx, shell: &NavigationShell) {
    let session = ctx.session().get().await;
    match session.user.filter(|_| session.token.is_some()) {
        Some(user) => println!("Signed in as {}", user.display_name()),
        None if shell.is_authenticated() => println!("Signed in"),
        None => println!("Not signed in"),
    }
    let tabs: Vec<&str> = shell.tabs().iter().map(|s| s.title()).collect();
    println!("Screens: {}", tabs.join(", "));
}

pub async fn login(
    ctx: &Ctx,
    shell: &mut NavigationShell,
    email: &str,
    password: &str,
) -> Result<()> {
    if shell.is_authenticated() {
        bail!("Already signed in. Run `garrison logout` first.");
    }
    let user = ctx.actions().login(email, password).await?;
    shell.sync();
    println!("Welcome, {}", user.display_name());
    Ok(())
}

pub async fn logout(ctx: &Ctx, shell: &mut NavigationShell) -> Result<()> {
    ctx.actions().logout().await?;
    shell.sync();
    println!("Signed out");
    Ok(())
}

pub async fn missions(ctx: &Ctx, shell: &mut NavigationShell) -> Result<()> {
    shell.navigate(Screen::Missions)?;
    let missions = load::<app::Missions>(ctx).await?;
    if missions.is_empty() {
        println!("No missions");
    }
    for mission in &missions {
        print_mission(mission);
    }
    Ok(())
}

pub async fn appointments(ctx: &Ctx, shell: &mut NavigationShell) -> Result<()> {
    shell.navigate(Screen::Appointments)?;
    let appointments = load::<app::Appointments>(ctx).await?;
    if appointments.is_empty() {
        println!("No appointments");
    }
    for appointment in &appointments {
        print_appointment(appointment);
    }
    Ok(())
}

pub async fn notifications(ctx: &Ctx, shell: &mut NavigationShell) -> Result<()> {
    shell.navigate(Screen::Notifications)?;
    let notifications = load::<app::Notifications>(ctx).await?;
    print_notifications(&notifications);
    Ok(())
}

pub async fn mark_read(ctx: &Ctx, shell: &mut NavigationShell, id: &str) -> Result<()> {
    shell.navigate(Screen::Notifications)?;
    let loader = ctx.loader::<app::Notifications>();
    settle(loader.load().await)?;

    ctx.actions()
        .mark_notification_read(&loader, &Id::from(id))
        .await?;
    print_notifications(&loader.data().unwrap_or_default());
    Ok(())
}

pub async fn delete(ctx: &Ctx, shell: &mut NavigationShell, id: &str) -> Result<()> {
    shell.navigate(Screen::Notifications)?;
    let loader = ctx.loader::<app::Notifications>();
    settle(loader.load().await)?;

    ctx.actions().delete_notification(&loader, &Id::from(id)).await?;
    println!("Deleted notification {}", id);
    print_notifications(&loader.data().unwrap_or_default());
    Ok(())
}

pub async fn department(ctx: &Ctx, shell: &mut NavigationShell) -> Result<()> {
    shell.navigate(Screen::Department)?;
    let department = load::<app::DepartmentRoster>(ctx).await?;
    print_department(&department);
    Ok(())
}

pub async fn profile(ctx: &Ctx, shell: &mut NavigationShell) -> Result<()> {
    shell.navigate(Screen::Profile)?;
    let user = ctx
        .session()
        .get()
        .await
        .user
        .ok_or(AppError::AuthorizationMissing)?;

    println!("{}", user.display_name());
    println!("  email:   {}", user.email);
    println!("  phone:   {}", user.phone);
    println!("  address: {}", user.address);
    if let Some(role) = &user.role {
        println!("  role:    {}", role);
    }
    Ok(())
}

pub async fn update_profile(
    ctx: &Ctx,
    shell: &mut NavigationShell,
    edits: ProfileEdits,
) -> Result<()> {
    shell.navigate(Screen::Profile)?;
    let user = ctx
        .session()
        .get()
        .await
        .user
        .ok_or(AppError::AuthorizationMissing)?;

    let mut update = ProfileUpdate::from_user(&user);
    if let Some(v) = edits.firstname {
        update.firstname = v;
    }
    if let Some(v) = edits.lastname {
        update.lastname = v;
    }
    if let Some(v) = edits.email {
        update.email = v;
    }
    if let Some(v) = edits.phone {
        update.phone = v;
    }
    if let Some(v) = edits.address {
        update.address = v;
    }

    let message = ctx.actions().update_profile(&update).await?;
    println!("{}", message);
    Ok(())
}

pub async fn change_password(
    ctx: &Ctx,
    shell: &mut NavigationShell,
    old: String,
    new: String,
    confirm: String,
) -> Result<()> {
    shell.navigate(Screen::Profile)?;
    let mut form = PasswordChange {
        old_password: old,
        new_password: new,
        confirm_password: confirm,
    };
    let message = ctx.actions().change_password(&mut form).await?;
    println!("{}", message);
    Ok(())
}

async fn load<R: Resource>(ctx: &Ctx) -> Result<R::Output> {
    settle(ctx.loader::<R>().load().await)
}

fn settle<T>(state: LoadState<T>) -> Result<T> {
    match state {
        LoadState::Success(data) => Ok(data),
        LoadState::Error(message) => Err(anyhow!(message)),
        LoadState::Idle | LoadState::Loading => Err(AppError::AuthorizationMissing.into()),
    }
}

fn print_mission(mission: &Mission) {
    print!("#{} {} [{}]", mission.id, mission.name, mission.status);
    if let Some(location) = &mission.location {
        print!(" @ {}", location);
    }
    println!();
    if let (Some(start), Some(end)) = (mission.start_date, mission.end_date) {
        println!("  {} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
    }
    if let Some(country) = &mission.country {
        for line in country_lines(country) {
            println!("  {}", line);
        }
    }
}

fn country_lines(country: &Country) -> Vec<String> {
    let name = country
        .common_name
        .as_deref()
        .or(country.official_name.as_deref())
        .unwrap_or("unknown country");
    let mut lines = vec![match country.official_name.as_deref() {
        Some(official) if official != name => format!("Country: {} ({})", name, official),
        _ => format!("Country: {}", name),
    }];
    if let Some(capital) = &country.capital {
        lines.push(format!("  capital: {}", capital));
    }
    if let Some(region) = &country.region {
        lines.push(format!("  region:  {}", region));
    }
    if let Some(flag) = &country.flag_url {
        lines.push(format!("  flag:    {}", flag));
    }
    lines
}

fn print_appointment(appointment: &Appointment) {
    let mission = appointment
        .mission
        .as_ref()
        .map(|m| m.name.as_str())
        .unwrap_or("unknown mission");
    let status = appointment.status.as_deref().unwrap_or("pending");
    print!("#{} {} ({})", appointment.id, mission, status);
    if let Some(assigner) = &appointment.assigner {
        print!(" by {}", assigner.full_name());
    }
    println!();
}

fn print_notifications(notifications: &[Notification]) {
    println!("{} unread of {}", unread_count(notifications), notifications.len());
    for n in notifications {
        let marker = if n.is_read { " " } else { "*" };
        let when = n
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "undated".to_string());
        println!("{} #{} {}  {}", marker, n.id, when, n.title);
        if !n.message.is_empty() {
            println!("    {}", n.message);
        }
    }
}

fn print_department(department: &Department) {
    println!("{}", department.name);
    if let Some(description) = &department.description {
        println!("  {}", description);
    }
    if let Some(reader) = &department.reader {
        println!("  Reader: {}", reader.full_name());
    }
    println!("  Members ({}):", department.member_count());
    for member in &department.members {
        match &member.role {
            Some(role) => println!("    {} ({})", member.full_name(), role),
            None => println!("    {}", member.full_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_lines() {
        let country = Country {
            common_name: Some("South Sudan".into()),
            official_name: Some("Republic of South Sudan".into()),
            region: Some("Africa".into()),
            capital: Some("Juba".into()),
            flag_url: Some("https://flags.example/ss.png".into()),
        };
        assert_eq!(
            country_lines(&country),
            vec![
                "Country: South Sudan (Republic of South Sudan)",
                "  capital: Juba",
                "  region:  Africa",
                "  flag:    https://flags.example/ss.png",
            ]
        );

        let sparse = Country {
            official_name: Some("Republic of Mali".into()),
            ..Default::default()
        };
        assert_eq!(country_lines(&sparse), vec!["Country: Republic of Mali"]);
    }
}
