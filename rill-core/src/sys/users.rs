/// Returns the login name of the real user id, if one can be determined.
pub fn get_current_username() -> Option<String> {
    let username = uzers::get_current_username()?;
    Some(username.to_string_lossy().to_string())
}
