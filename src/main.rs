fn main() {
    sky_strike::game::run();
}
