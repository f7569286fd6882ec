use jgemu::{Error, ErrorKind, OptionKind, Session};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"rom").unwrap();
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.ini");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn missing_config() {
    let dir = TempDir::new().unwrap();
    let err = Session::load(dir.path().join("config.ini")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigMissing);
}

#[test]
fn config_without_platforms() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "; nothing configured yet\n");
    assert_eq!(Session::load(path).unwrap_err().kind(), ErrorKind::ConfigEmpty);
}

#[test]
fn malformed_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "games = /roms\n");
    assert_eq!(Session::load(path).unwrap_err().kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn select_lists_matching_games() {
    let dir = TempDir::new().unwrap();
    let nes = dir.path().join("nes");
    touch(&nes.join("Metroid.nes"));
    touch(&nes.join("Homebrew/Alter Ego.nes"));
    touch(&nes.join("manual.pdf"));

    let path = write_config(
        &dir,
        &format!(
            "[Nintendo - NES]\ngames = {}\nexecutable = /usr/bin/fceux\nextensions = .nes\n\n\
             [Broken]\ngames = {}\nextensions = .nes\n",
            nes.display(),
            nes.display()
        ),
    );

    let session = Session::load(path).unwrap();
    assert_eq!(session.platforms(), ["Nintendo - NES", "Broken"]);

    let selection = session.select("Nintendo - NES").unwrap();
    assert_eq!(selection.game_count(), 2);
    let mut names: Vec<String> = selection
        .games()
        .iter()
        .map(|g| g.relative_path().to_string_lossy().replace('\\', "/"))
        .collect();
    names.sort();
    assert_eq!(names, vec!["Homebrew/Alter Ego.nes", "Metroid.nes"]);

    let err = session.select("Broken").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingOption(OptionKind::Executable));
}

#[test]
fn unreadable_games_folder_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        &format!(
            "[GBA]\ngames = {}\nexecutable = /usr/bin/mgba\nextensions = .gba\n",
            dir.path().join("missing").display()
        ),
    );
    let session = Session::load(path).unwrap();
    assert_eq!(
        session.select("GBA").unwrap_err().kind(),
        ErrorKind::GamesFolderUnreadable
    );
}

#[test]
fn reload_replaces_everything() {
    let dir = TempDir::new().unwrap();
    let snes = dir.path().join("snes");
    let md = dir.path().join("md");
    touch(&snes.join("Zelda.sfc"));
    touch(&md.join("Sonic.md"));

    let path = write_config(
        &dir,
        &format!(
            "[SNES]\ngames = {}\nexecutable = /usr/bin/snes9x\nextensions = .sfc\n",
            snes.display()
        ),
    );
    let first = Session::load(&path).unwrap();
    assert_eq!(first.select("SNES").unwrap().game_count(), 1);

    write_config(
        &dir,
        &format!(
            "[Mega Drive]\ngames = {}\nexecutable = /usr/bin/blastem\nextensions = .md, .bin\n",
            md.display()
        ),
    );
    let second = first.reload().unwrap();

    assert_eq!(second.platforms(), ["Mega Drive"]);
    assert_eq!(
        second.select("SNES").unwrap_err().kind(),
        ErrorKind::UnknownPlatform
    );
    let selection = second.select("Mega Drive").unwrap();
    assert_eq!(selection.games()[0].to_string(), "Sonic.md");

    // The old session is a value of its own and still describes the old file
    assert_eq!(first.platforms(), ["SNES"]);
}

#[cfg(unix)]
#[test]
fn launch_through_a_selection() {
    let dir = TempDir::new().unwrap();
    let games = dir.path().join("games");
    touch(&games.join("demo.rom"));

    let path = write_config(
        &dir,
        &format!(
            "[Shell]\ngames = {}\nexecutable = /bin/sh\nextensions = .rom\n\
             parameters = -c, test -f \"$0\" && echo found\n\n\
             [Failing]\ngames = {}\nexecutable = /bin/sh\nextensions = .rom\n\
             parameters = -c, echo nope >&2; exit 2\n",
            games.display(),
            games.display()
        ),
    );
    let session = Session::load(path).unwrap();
    let launcher = jgemu::DirectLauncher;

    let selection = session.select("Shell").unwrap();
    let output = selection.launch(0, &launcher).unwrap();
    assert_eq!(output.stdout, "found\n");

    let past_the_end = Error::from(selection.launch(1, &launcher).unwrap_err());
    assert_eq!(past_the_end.kind(), ErrorKind::UnexpectedFailure);

    let failing = session.select("Failing").unwrap();
    let err = Error::from(failing.launch(0, &launcher).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::LaunchFailure);
    assert!(err.to_string().contains("STDERR: nope\n"));
}

#[cfg(unix)]
#[test]
fn launch_with_missing_emulator() {
    let dir = TempDir::new().unwrap();
    let games = dir.path().join("games");
    touch(&games.join("demo.rom"));

    let path = write_config(
        &dir,
        &format!(
            "[Ghost]\ngames = {}\nexecutable = {}\nextensions = .rom\n",
            games.display(),
            dir.path().join("emulators/ghost").display()
        ),
    );
    let session = Session::load(path).unwrap();
    let selection = session.select("Ghost").unwrap();
    let err = Error::from(selection.launch(0, &jgemu::DirectLauncher).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::UnexpectedFailure);
}
